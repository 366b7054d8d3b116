use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Document identifier, taken from the text before the first comma of a corpus line.
pub type DocId = i64;

/// Document represents one line of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Parse a `"<docId>,<text>"` line.
    ///
    /// Only the first comma separates the id; any later commas belong to the
    /// text. Whitespace around the id is ignored.
    pub fn parse_line(line: &str) -> Result<Self> {
        let (id, text) = line
            .split_once(',')
            .ok_or_else(|| Error::malformed_input(line, "missing ',' between id and text"))?;

        let id = id
            .trim()
            .parse::<DocId>()
            .map_err(|e| Error::malformed_input(line, format!("invalid document id: {}", e)))?;

        Ok(Self::new(id, text))
    }
}
