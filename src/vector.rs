//! Per-document TF-IDF weight vector and its binary encoding.
//!
//! Layout (big-endian):
//!
//! ```text
//! i32 term_count
//! term_count x (u16 byte_len, UTF-8 bytes)
//! i32 weight_count
//! weight_count x f64
//! ```
//!
//! The document id is not part of the encoding; it travels with the record
//! that holds the bytes.

use crate::document::DocId;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const COUNT_LEN: usize = 4;
const TERM_LEN_PREFIX: usize = 2;
const WEIGHT_LEN: usize = 8;

/// Ordered (term, weight) pairs of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorParts")]
pub struct WeightVector {
    doc_id: DocId,
    terms: Vec<String>,
    weights: Vec<f64>,
}

impl WeightVector {
    pub fn new(doc_id: DocId) -> Self {
        Self {
            doc_id,
            terms: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Build a vector from separate term and weight lists of equal length
    pub fn from_parts(doc_id: DocId, terms: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        if terms.len() != weights.len() {
            return Err(Error::DataConsistency(format!(
                "document {} has {} terms but {} weights",
                doc_id,
                terms.len(),
                weights.len()
            )));
        }
        Ok(Self {
            doc_id,
            terms,
            weights,
        })
    }

    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    /// Append a term with its weight
    pub fn add(&mut self, term: impl Into<String>, weight: f64) {
        self.terms.push(term.into());
        self.weights.push(weight);
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of the first occurrence of `term`
    pub fn get(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .map(|i| self.weights[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.terms
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Term -> weight view, for comparisons that ignore order
    pub fn to_map(&self) -> HashMap<String, f64> {
        self.iter().map(|(t, w)| (t.to_string(), w)).collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
        self.weights.clear();
    }

    /// Serialize the term and weight lists
    pub fn encode(&self) -> Result<Vec<u8>> {
        let term_bytes: usize = self.terms.iter().map(|t| TERM_LEN_PREFIX + t.len()).sum();
        let mut out =
            Vec::with_capacity(2 * COUNT_LEN + term_bytes + self.weights.len() * WEIGHT_LEN);

        out.extend_from_slice(&encode_count(self.terms.len())?.to_be_bytes());
        for term in &self.terms {
            let len = u16::try_from(term.len()).map_err(|_| {
                Error::MalformedVector(format!(
                    "term of {} bytes exceeds the {} byte limit",
                    term.len(),
                    u16::MAX
                ))
            })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(term.as_bytes());
        }

        out.extend_from_slice(&encode_count(self.weights.len())?.to_be_bytes());
        for weight in &self.weights {
            out.extend_from_slice(&weight.to_be_bytes());
        }

        Ok(out)
    }

    /// Deserialize a vector written by [`encode`](Self::encode)
    pub fn decode(doc_id: DocId, bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);

        let term_count = reader.read_count("term")?;
        // every term needs at least its length prefix
        reader.ensure(term_count.saturating_mul(TERM_LEN_PREFIX), "terms")?;
        let mut terms = Vec::with_capacity(term_count);
        for _ in 0..term_count {
            let len = u16::from_be_bytes(reader.read_array()?) as usize;
            let raw = reader.take(len)?;
            let term = std::str::from_utf8(raw)
                .map_err(|e| Error::MalformedVector(format!("term is not UTF-8: {}", e)))?;
            terms.push(term.to_string());
        }

        let weight_count = reader.read_count("weight")?;
        reader.ensure(weight_count.saturating_mul(WEIGHT_LEN), "weights")?;
        let mut weights = Vec::with_capacity(weight_count);
        for _ in 0..weight_count {
            weights.push(f64::from_be_bytes(reader.read_array()?));
        }

        if reader.remaining() > 0 {
            return Err(Error::MalformedVector(format!(
                "{} trailing bytes after weights",
                reader.remaining()
            )));
        }
        if term_count != weight_count {
            return Err(Error::MalformedVector(format!(
                "{} terms but {} weights",
                term_count, weight_count
            )));
        }

        Ok(Self {
            doc_id,
            terms,
            weights,
        })
    }
}

/// Unchecked serde form, validated through [`WeightVector::from_parts`]
#[derive(Deserialize)]
struct VectorParts {
    doc_id: DocId,
    terms: Vec<String>,
    weights: Vec<f64>,
}

impl TryFrom<VectorParts> for WeightVector {
    type Error = Error;

    fn try_from(parts: VectorParts) -> Result<Self> {
        WeightVector::from_parts(parts.doc_id, parts.terms, parts.weights)
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeightVector[[{}],[", self.terms.join(", "))?;
        for (i, weight) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", weight)?;
        }
        write!(f, "]]")
    }
}

fn encode_count(count: usize) -> Result<i32> {
    i32::try_from(count)
        .map_err(|_| Error::MalformedVector(format!("{} entries do not fit an i32 count", count)))
}

/// Bounds-checked cursor over encoded bytes
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::MalformedVector(format!(
                "{} need at least {} bytes, {} available",
                what,
                needed,
                self.remaining()
            )));
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len, "field")?;
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = i32::from_be_bytes(self.read_array()?);
        usize::try_from(count)
            .map_err(|_| Error::MalformedVector(format!("negative {} count {}", what, count)))
    }
}
