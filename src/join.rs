use crate::document::DocId;
use crate::document_frequency::DocFrequencyTable;
use crate::error::{Error, Result};
use crate::term_frequency::TermFrequencyEntry;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// TF-IDF weight of one term in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub doc_id: DocId,
    pub term: String,
    pub weight: f64,
}

impl WeightedTerm {
    pub fn new(doc_id: DocId, term: impl Into<String>, weight: f64) -> Self {
        Self {
            doc_id,
            term: term.into(),
            weight,
        }
    }
}

/// Output of joining a whole term-frequency table
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub weighted: Vec<WeightedTerm>,
    /// Term-frequency entries without a document frequency (dropped by the inner join)
    pub unmatched: usize,
}

/// Inner join of document frequencies and term frequencies on the term
#[derive(Debug, Clone, Copy)]
pub struct TfIdfJoiner {
    total_docs: u64,
}

impl TfIdfJoiner {
    pub fn new(total_docs: u64) -> Result<Self> {
        if total_docs == 0 {
            return Err(Error::InvalidConfig(
                "total document count must be at least 1".to_string(),
            ));
        }
        Ok(Self { total_docs })
    }

    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    /// Weight one term-frequency entry.
    ///
    /// Returns `Ok(None)` when the term has no document frequency.
    pub fn join(
        &self,
        df: &DocFrequencyTable,
        entry: &TermFrequencyEntry,
    ) -> Result<Option<WeightedTerm>> {
        let doc_count = match df.get(&entry.term) {
            Some(count) => count,
            None => return Ok(None),
        };

        if doc_count == 0 {
            return Err(Error::DataConsistency(format!(
                "document frequency of {:?} is zero",
                entry.term
            )));
        }
        if doc_count > self.total_docs {
            return Err(Error::DataConsistency(format!(
                "document frequency of {:?} is {} but the corpus has only {} documents",
                entry.term, doc_count, self.total_docs
            )));
        }

        let idf = (self.total_docs as f64 / doc_count as f64).ln();
        let weight = entry.occurrences as f64 * idf;

        Ok(Some(WeightedTerm::new(entry.doc_id, entry.term.clone(), weight)))
    }

    /// Join every entry, keeping the order of `entries`
    pub fn join_all(
        &self,
        df: &DocFrequencyTable,
        entries: &[TermFrequencyEntry],
    ) -> Result<JoinOutput> {
        let joined = entries
            .par_iter()
            .map(|entry| self.join(df, entry))
            .collect::<Result<Vec<Option<WeightedTerm>>>>()?;

        let total = joined.len();
        let weighted: Vec<WeightedTerm> = joined.into_iter().flatten().collect();
        let unmatched = total - weighted.len();

        if unmatched > 0 {
            tracing::debug!("join dropped {} term-frequency entries without a document frequency", unmatched);
        }

        Ok(JoinOutput { weighted, unmatched })
    }
}
