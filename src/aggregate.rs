use crate::document::DocId;
use crate::error::{Error, Result};
use crate::join::WeightedTerm;
use crate::vector::WeightVector;
use std::collections::BTreeMap;

/// Groups weighted terms by document into one [`WeightVector`] each
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightVectorAggregator;

impl WeightVectorAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Fold one already-grouped batch of records into the vector of `doc_id`.
    ///
    /// Terms keep their arrival order. A record of another document is a
    /// consistency error.
    pub fn aggregate_group<I>(&self, doc_id: DocId, group: I) -> Result<WeightVector>
    where
        I: IntoIterator<Item = WeightedTerm>,
    {
        let mut vector = WeightVector::new(doc_id);
        for record in group {
            if record.doc_id != doc_id {
                return Err(Error::DataConsistency(format!(
                    "record for document {} routed to the vector of document {}",
                    record.doc_id, doc_id
                )));
            }
            vector.add(record.term, record.weight);
        }
        Ok(vector)
    }

    /// Group records by document id, returning vectors ordered by id
    pub fn aggregate<I>(&self, records: I) -> Result<Vec<WeightVector>>
    where
        I: IntoIterator<Item = WeightedTerm>,
    {
        let mut groups: BTreeMap<DocId, Vec<WeightedTerm>> = BTreeMap::new();
        for record in records {
            groups.entry(record.doc_id).or_default().push(record);
        }

        groups
            .into_iter()
            .map(|(doc_id, group)| self.aggregate_group(doc_id, group))
            .collect()
    }
}
