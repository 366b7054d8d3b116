use crate::document::{DocId, Document};
use crate::tokenizer::Tokenizer;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One occurrence of a term in a document, before grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermOccurrence {
    pub doc_id: DocId,
    pub term: String,
    pub count: u64,
}

/// Raw number of occurrences of a term within one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequencyEntry {
    pub doc_id: DocId,
    pub term: String,
    pub occurrences: u64,
}

/// Emits every term occurrence of a document.
///
/// Unlike [`DocumentFrequencyCounter`](crate::DocumentFrequencyCounter), no
/// stop-word filtering happens here: stop-word occurrences are counted and only
/// disappear later because the join finds no document frequency for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyCounter {
    tokenizer: Tokenizer,
}

impl TermFrequencyCounter {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    /// One `(doc_id, term, 1)` record per token
    pub fn map_document<'a>(&self, doc: &'a Document) -> impl Iterator<Item = TermOccurrence> + 'a {
        let doc_id = doc.id;
        self.tokenizer
            .tokenize(&doc.text)
            .map(move |term| TermOccurrence {
                doc_id,
                term,
                count: 1,
            })
    }

    /// Count term frequencies over a corpus.
    ///
    /// Partial tables are merged left to right, so entries keep corpus order.
    pub fn count(&self, docs: &[Document]) -> TermFrequencyTable {
        docs.par_iter()
            .fold(TermFrequencyTable::new, |mut table, doc| {
                table.extend(self.map_document(doc));
                table
            })
            .reduce(TermFrequencyTable::new, TermFrequencyTable::merge)
    }
}

/// (doc_id, term) -> occurrences, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencyTable {
    counts: IndexMap<(DocId, String), u64>,
}

impl TermFrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }

    pub fn add(&mut self, occurrence: TermOccurrence) {
        *self
            .counts
            .entry((occurrence.doc_id, occurrence.term))
            .or_insert(0) += occurrence.count;
    }

    /// Append `other` after this table, summing shared keys
    pub fn merge(mut self, other: TermFrequencyTable) -> Self {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        self
    }

    pub fn get(&self, doc_id: DocId, term: &str) -> Option<u64> {
        self.counts.get(&(doc_id, term.to_string())).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = TermFrequencyEntry> + '_ {
        self.counts
            .iter()
            .map(|((doc_id, term), &occurrences)| TermFrequencyEntry {
                doc_id: *doc_id,
                term: term.clone(),
                occurrences,
            })
    }

    pub fn into_entries(self) -> Vec<TermFrequencyEntry> {
        self.counts
            .into_iter()
            .map(|((doc_id, term), occurrences)| TermFrequencyEntry {
                doc_id,
                term,
                occurrences,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Extend<TermOccurrence> for TermFrequencyTable {
    fn extend<I: IntoIterator<Item = TermOccurrence>>(&mut self, iter: I) {
        for occurrence in iter {
            self.add(occurrence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_document_emits_every_occurrence() {
        let counter = TermFrequencyCounter::new();
        let doc = Document::new(3, "Big Big Big Data");
        let records: Vec<TermOccurrence> = counter.map_document(&doc).collect();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.doc_id == 3 && r.count == 1));
        assert_eq!(records.iter().filter(|r| r.term == "big").count(), 3);
    }

    #[test]
    fn test_stop_words_are_counted() {
        // Term frequency keeps stop-words; only the document-frequency stage drops them.
        let table = TermFrequencyCounter::new().count(&[Document::new(1, "the data is the big")]);
        assert_eq!(table.get(1, "the"), Some(2));
        assert_eq!(table.get(1, "is"), Some(1));
        assert_eq!(table.get(1, "data"), Some(1));
    }

    #[test]
    fn test_count_groups_by_document_and_term() {
        let docs = vec![
            Document::new(1, "Big Big Big Data"),
            Document::new(2, "Hello Big Data"),
        ];
        let table = TermFrequencyCounter::new().count(&docs);
        assert_eq!(table.get(1, "big"), Some(3));
        assert_eq!(table.get(1, "data"), Some(1));
        assert_eq!(table.get(2, "big"), Some(1));
        assert_eq!(table.get(2, "hello"), Some(1));
        assert_eq!(table.get(1, "hello"), None);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_entries_keep_first_seen_order() {
        let docs = vec![
            Document::new(2, "zeta alpha zeta"),
            Document::new(1, "beta"),
        ];
        let keys: Vec<(DocId, String)> = TermFrequencyCounter::new()
            .count(&docs)
            .into_entries()
            .into_iter()
            .map(|e| (e.doc_id, e.term))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2, "zeta".to_string()),
                (2, "alpha".to_string()),
                (1, "beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_occurrences_are_positive() {
        let docs = vec![Document::new(1, "a b c a"), Document::new(2, "")];
        let table = TermFrequencyCounter::new().count(&docs);
        assert!(table.entries().all(|e| e.occurrences >= 1));
        assert_eq!(table.len(), 3);
    }
}
