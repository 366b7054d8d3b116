use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static::lazy_static! {
    static ref DEFAULT_STOP_WORDS: HashSet<&'static str> = {
        [
            "the", "i", "a", "an", "at", "are", "am", "for", "and", "or", "is", "there",
            "it", "this", "that", "on", "was", "by", "of", "to", "in", "not", "be",
            "with", "you", "have", "as", "can",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// Word characters survive normalization, everything else separates tokens.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits raw text into lower-cased terms.
///
/// Stop-words are not removed here; callers decide whether to filter them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Lazily tokenize text into terms
    pub fn tokenize<'a>(&self, text: &'a str) -> Tokens<'a> {
        Tokens { rest: text }
    }
}

/// Iterator over the terms of one text. Cloning it restarts from the same position.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.find(is_word_char)?;
        let rest = &self.rest[start..];
        let end = rest
            .find(|c: char| !is_word_char(c))
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Some(token.to_ascii_lowercase())
    }
}

/// Set of terms excluded from document-frequency counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// No stop-words at all
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Load stop-words from a file, one per line. Blank lines and `#` comments are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let words: Self = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();

        if words.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "stop-word file {} contains no words",
                path.display()
            )));
        }
        Ok(words)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        DEFAULT_STOP_WORDS.iter().copied().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }
}
