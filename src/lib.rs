// Re-export main components
pub mod aggregate;
pub mod document;
pub mod document_frequency;
pub mod error;
pub mod join;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod storage;
pub mod term_frequency;
pub mod tokenizer;
pub mod vector;

// Re-export commonly used types
pub use aggregate::WeightVectorAggregator;
pub use document::{DocId, Document};
pub use document_frequency::{DocFrequencyEntry, DocFrequencyTable, DocumentFrequencyCounter};
pub use join::{JoinOutput, TfIdfJoiner, WeightedTerm};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, RunSummary};
pub use sink::{JsonLinesSink, TextSink, VectorSink};
pub use storage::VectorStore;
pub use term_frequency::{TermFrequencyCounter, TermFrequencyEntry, TermFrequencyTable, TermOccurrence};
pub use tokenizer::{StopWords, Tokenizer, Tokens};
pub use vector::WeightVector;

// Re-export error types
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() -> Result<()> {
        let pipeline = Pipeline::new(PipelineConfig::new(2))?;
        let output = pipeline.run_lines([
            "1,Big Hello to Stratosphere! :-)",
            "2,Hello to Big Big Data.",
        ])?;

        assert_eq!(output.vectors.len(), 2);

        let store = VectorStore::in_memory()?;
        store.save_vectors(&output.vectors)?;
        assert_eq!(store.get_vector(1)?.as_ref(), output.vectors.first());

        Ok(())
    }
}
