use crate::document::Document;
use crate::tokenizer::{StopWords, Tokenizer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Number of distinct documents containing a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFrequencyEntry {
    pub term: String,
    pub doc_count: u64,
}

/// Emits the distinct qualifying terms of each document.
///
/// A term repeated three times in one document is emitted once for it.
#[derive(Debug, Clone, Default)]
pub struct DocumentFrequencyCounter {
    tokenizer: Tokenizer,
    stop_words: StopWords,
}

impl DocumentFrequencyCounter {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            stop_words,
        }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Distinct terms of one document, stop-words removed
    pub fn map_document(&self, doc: &Document) -> HashSet<String> {
        self.tokenizer
            .tokenize(&doc.text)
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Count document frequencies over a corpus.
    ///
    /// Each rayon worker folds into its own table; partial tables are summed afterwards.
    pub fn count(&self, docs: &[Document]) -> DocFrequencyTable {
        docs.par_iter()
            .fold(DocFrequencyTable::new, |mut table, doc| {
                table.add_document(self.map_document(doc));
                table
            })
            .reduce(DocFrequencyTable::new, DocFrequencyTable::merge)
    }
}

/// Term -> document count, the grouped output of the document-frequency stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFrequencyTable {
    counts: HashMap<String, u64>,
}

impl DocFrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Add the distinct terms of one document
    pub fn add_document(&mut self, terms: HashSet<String>) {
        for term in terms {
            *self.counts.entry(term).or_insert(0) += 1;
        }
    }

    /// Sum another partial table into this one
    pub fn merge(mut self, other: DocFrequencyTable) -> Self {
        if self.counts.len() < other.counts.len() {
            return other.merge(self);
        }
        for (term, count) in other.counts {
            *self.counts.entry(term).or_insert(0) += count;
        }
        self
    }

    /// Get the number of documents containing a term
    pub fn get(&self, term: &str) -> Option<u64> {
        self.counts.get(term).copied()
    }

    /// Entries sorted by term
    pub fn entries(&self) -> Vec<DocFrequencyEntry> {
        let mut entries: Vec<DocFrequencyEntry> = self
            .counts
            .iter()
            .map(|(term, &doc_count)| DocFrequencyEntry {
                term: term.clone(),
                doc_count,
            })
            .collect();
        entries.sort_by(|a, b| a.term.cmp(&b.term));
        entries
    }

    pub fn max_doc_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<DocFrequencyEntry> for DocFrequencyTable {
    fn from_iter<I: IntoIterator<Item = DocFrequencyEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            *table.counts.entry(entry.term).or_insert(0) += entry.doc_count;
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(1, "Big Big Big Data"),
            Document::new(2, "Hello Big Data"),
        ]
    }

    #[test]
    fn test_map_document_deduplicates() {
        let counter = DocumentFrequencyCounter::default();
        let terms = counter.map_document(&Document::new(1, "Big Big Big Data big"));
        assert_eq!(terms.len(), 2);
        assert!(terms.contains("big"));
        assert!(terms.contains("data"));
    }

    #[test]
    fn test_map_document_drops_stop_words() {
        let stop_words: StopWords = ["the", "is"].into_iter().collect();
        let counter = DocumentFrequencyCounter::new(stop_words);
        let terms = counter.map_document(&Document::new(1, "the data is big"));
        let expected: HashSet<String> = ["data", "big"].iter().map(|s| s.to_string()).collect();
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_stop_word_only_document_contributes_nothing() {
        let counter = DocumentFrequencyCounter::default();
        let table = counter.count(&[Document::new(7, "The is a to")]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_count() {
        let table = DocumentFrequencyCounter::default().count(&corpus());
        assert_eq!(table.get("big"), Some(2));
        assert_eq!(table.get("data"), Some(2));
        assert_eq!(table.get("hello"), Some(1));
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_doc_counts_are_bounded_by_corpus_size() {
        let docs = vec![
            Document::new(1, "alpha beta beta gamma"),
            Document::new(2, "beta gamma gamma gamma"),
            Document::new(3, "gamma delta"),
            Document::new(4, "the is"),
        ];
        let table = DocumentFrequencyCounter::default().count(&docs);
        for entry in table.entries() {
            assert!(entry.doc_count >= 1, "{:?}", entry);
            assert!(entry.doc_count <= docs.len() as u64, "{:?}", entry);
        }
        assert_eq!(table.max_doc_count(), 3);
    }

    #[test]
    fn test_merge_sums_partial_tables() {
        let counter = DocumentFrequencyCounter::default();
        let docs = corpus();

        let mut left = DocFrequencyTable::new();
        left.add_document(counter.map_document(&docs[0]));
        let mut right = DocFrequencyTable::new();
        right.add_document(counter.map_document(&docs[1]));

        assert_eq!(left.merge(right), counter.count(&docs));
    }

    #[test]
    fn test_entries_are_sorted() {
        let table = DocumentFrequencyCounter::default().count(&corpus());
        let terms: Vec<String> = table.entries().into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["big", "data", "hello"]);
    }
}
