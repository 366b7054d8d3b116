use crate::aggregate::WeightVectorAggregator;
use crate::document::{DocId, Document};
use crate::document_frequency::{DocFrequencyTable, DocumentFrequencyCounter};
use crate::error::Result;
use crate::join::TfIdfJoiner;
use crate::term_frequency::{TermFrequencyCounter, TermFrequencyTable};
use crate::tokenizer::StopWords;
use crate::vector::WeightVector;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Corpus size used in the IDF term, supplied by the caller
    pub total_docs: u64,
    /// Worker threads, 0 lets rayon decide
    pub parallelism: usize,
    pub stop_words: StopWords,
}

impl PipelineConfig {
    pub fn new(total_docs: u64) -> Self {
        Self {
            total_docs,
            parallelism: 0,
            stop_words: StopWords::default(),
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }
}

/// Counts collected while running the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_docs: u64,
    pub documents: usize,
    pub distinct_terms: usize,
    pub term_frequency_entries: usize,
    pub weighted_terms: usize,
    pub unmatched_entries: usize,
    pub vectors: usize,
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub vectors: Vec<WeightVector>,
    pub summary: RunSummary,
}

impl PipelineOutput {
    /// Output of a corpus without documents
    pub fn empty(total_docs: u64) -> Self {
        Self {
            vectors: Vec::new(),
            summary: RunSummary {
                total_docs,
                ..Default::default()
            },
        }
    }
}

/// TF-IDF pipeline: document frequency, term frequency, join, aggregation
pub struct Pipeline {
    df_counter: DocumentFrequencyCounter,
    tf_counter: TermFrequencyCounter,
    joiner: TfIdfJoiner,
    aggregator: WeightVectorAggregator,
    pool: ThreadPool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let joiner = TfIdfJoiner::new(config.total_docs)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|i| format!("tfidf-worker-{}", i))
            .build()?;

        Ok(Self {
            df_counter: DocumentFrequencyCounter::new(config.stop_words),
            tf_counter: TermFrequencyCounter::new(),
            joiner,
            aggregator: WeightVectorAggregator::new(),
            pool,
        })
    }

    pub fn total_docs(&self) -> u64 {
        self.joiner.total_docs()
    }

    pub fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Document-frequency stage alone
    pub fn document_frequencies(&self, docs: &[Document]) -> DocFrequencyTable {
        self.pool.install(|| self.df_counter.count(docs))
    }

    /// Term-frequency stage alone
    pub fn term_frequencies(&self, docs: &[Document]) -> TermFrequencyTable {
        self.pool.install(|| self.tf_counter.count(docs))
    }

    /// Parse `"<docId>,<text>"` lines and run the pipeline over them
    pub fn run_lines<I, S>(&self, lines: I) -> Result<PipelineOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let docs = crate::source::parse_lines(lines)?;
        self.run(&docs)
    }

    /// Compute one weight vector per document
    pub fn run(&self, docs: &[Document]) -> Result<PipelineOutput> {
        let start = Instant::now();
        warn_duplicate_ids(docs);

        if docs.len() as u64 > self.total_docs() {
            tracing::warn!(
                "corpus has {} documents but total_docs is {}",
                docs.len(),
                self.total_docs()
            );
        }

        // Both counting stages read the same corpus
        let (df, tf) = self.pool.install(|| {
            rayon::join(|| self.df_counter.count(docs), || self.tf_counter.count(docs))
        });
        tracing::debug!(
            "document frequency: {} terms, term frequency: {} entries",
            df.len(),
            tf.len()
        );

        let tf_entries = tf.into_entries();
        let joined = self
            .pool
            .install(|| self.joiner.join_all(&df, &tf_entries))?;

        let summary_base = RunSummary {
            total_docs: self.total_docs(),
            documents: docs.len(),
            distinct_terms: df.len(),
            term_frequency_entries: tf_entries.len(),
            weighted_terms: joined.weighted.len(),
            unmatched_entries: joined.unmatched,
            vectors: 0,
        };

        let vectors = self.aggregator.aggregate(joined.weighted)?;
        let summary = RunSummary {
            vectors: vectors.len(),
            ..summary_base
        };

        tracing::info!(
            "computed {} weight vectors from {} documents in {:?}",
            summary.vectors,
            summary.documents,
            start.elapsed()
        );

        Ok(PipelineOutput { vectors, summary })
    }
}

fn warn_duplicate_ids(docs: &[Document]) {
    let mut seen: HashSet<DocId> = HashSet::with_capacity(docs.len());
    for doc in docs {
        if !seen.insert(doc.id) {
            tracing::warn!("document id {} appears more than once; its lines are merged", doc.id);
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("total_docs", &self.total_docs())
            .field("parallelism", &self.parallelism())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(1, "Big Big Big Data"),
            Document::new(2, "Hello Big Data"),
        ]
    }

    #[test]
    fn test_pipeline_weights() -> Result<()> {
        let pipeline = Pipeline::new(PipelineConfig::new(2))?;
        let output = pipeline.run(&corpus())?;

        assert_eq!(output.vectors.len(), 2);
        let doc1 = &output.vectors[0];
        assert_eq!(doc1.doc_id(), 1);
        assert_eq!(doc1.get("big"), Some(0.0));
        assert_eq!(doc1.get("data"), Some(0.0));

        let doc2 = &output.vectors[1];
        assert_eq!(doc2.doc_id(), 2);
        let hello = doc2.get("hello").unwrap();
        assert!((hello - 2f64.ln()).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_stop_word_asymmetry_is_preserved() -> Result<()> {
        // Term frequency counts stop-words, document frequency drops them, so the
        // join silently discards their term-frequency entries. Known inconsistency.
        let pipeline = Pipeline::new(PipelineConfig::new(2))?;
        let output = pipeline.run(&[
            Document::new(1, "Big Hello to Stratosphere! :-)"),
            Document::new(2, "Hello to Big Big Data."),
        ])?;

        assert_eq!(output.summary.unmatched_entries, 2);
        for vector in &output.vectors {
            assert_eq!(vector.get("to"), None);
        }
        Ok(())
    }

    #[test]
    fn test_summary_counts() -> Result<()> {
        let output = Pipeline::new(PipelineConfig::new(2))?.run(&corpus())?;
        assert_eq!(
            output.summary,
            RunSummary {
                total_docs: 2,
                documents: 2,
                distinct_terms: 3,
                term_frequency_entries: 5,
                weighted_terms: 5,
                unmatched_entries: 0,
                vectors: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn test_run_lines() -> Result<()> {
        let pipeline = Pipeline::new(PipelineConfig::new(2))?;
        let output = pipeline.run_lines(["1,Big Big Big Data", "2,Hello Big Data"])?;
        assert_eq!(output.vectors.len(), 2);

        let err = pipeline.run_lines(["1 Big"]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
        Ok(())
    }

    #[test]
    fn test_total_docs_smaller_than_doc_frequency_fails() -> Result<()> {
        let pipeline = Pipeline::new(PipelineConfig::new(1))?;
        let err = pipeline.run(&corpus()).unwrap_err();
        assert!(matches!(err, Error::DataConsistency(_)));
        Ok(())
    }

    #[test]
    fn test_zero_total_docs_rejected() {
        assert!(matches!(
            Pipeline::new(PipelineConfig::new(0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_stop_words() -> Result<()> {
        let stop_words: StopWords = ["big"].into_iter().collect();
        let pipeline = Pipeline::new(PipelineConfig::new(2).with_stop_words(stop_words))?;
        let df = pipeline.document_frequencies(&corpus());
        assert_eq!(df.get("big"), None);
        assert_eq!(df.get("data"), Some(2));
        Ok(())
    }

    #[test]
    fn test_empty_output() {
        let output = PipelineOutput::empty(0);
        assert!(output.vectors.is_empty());
        assert_eq!(output.summary, RunSummary::default());
    }

    #[test]
    fn test_run_without_documents() -> Result<()> {
        let output = Pipeline::new(PipelineConfig::new(1))?.run(&[])?;
        assert!(output.vectors.is_empty());
        assert_eq!(output.summary.vectors, 0);
        Ok(())
    }

    #[test]
    fn test_parallelism_setting() -> Result<()> {
        let pipeline = Pipeline::new(PipelineConfig::new(2).with_parallelism(3))?;
        assert_eq!(pipeline.parallelism(), 3);
        Ok(())
    }
}
