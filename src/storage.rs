use crate::document::DocId;
use crate::error::{Error, Result};
use crate::pipeline::RunSummary;
use crate::vector::WeightVector;
use sled::Db;
use std::path::Path;

const VECTORS_TREE: &str = "vectors";
const METADATA_TREE: &str = "metadata";
const SUMMARY_KEY: &[u8] = b"run_summary";

/// Persistent sink for encoded weight vectors, keyed by document id
pub struct VectorStore {
    db: Db,
}

impl VectorStore {
    /// Open or create a vector store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    // ========== Vector Operations ==========

    /// Save the encoded form of a vector
    pub fn save_vector(&self, vector: &WeightVector) -> Result<()> {
        let tree = self.db.open_tree(VECTORS_TREE)?;
        tree.insert(vector.doc_id().to_be_bytes(), vector.encode()?)?;
        Ok(())
    }

    pub fn save_vectors(&self, vectors: &[WeightVector]) -> Result<()> {
        for vector in vectors {
            self.save_vector(vector)?;
        }
        Ok(())
    }

    /// Get the vector of a document
    pub fn get_vector(&self, doc_id: DocId) -> Result<Option<WeightVector>> {
        let tree = self.db.open_tree(VECTORS_TREE)?;
        match tree.get(doc_id.to_be_bytes())? {
            Some(data) => Ok(Some(WeightVector::decode(doc_id, &data)?)),
            None => Ok(None),
        }
    }

    /// Get all stored vectors
    pub fn all_vectors(&self) -> Result<Vec<WeightVector>> {
        let tree = self.db.open_tree(VECTORS_TREE)?;
        let mut vectors = Vec::new();

        for item in tree.iter() {
            let (key, value) = item?;
            vectors.push(WeightVector::decode(decode_doc_id(&key)?, &value)?);
        }

        Ok(vectors)
    }

    /// Count stored vectors
    pub fn count(&self) -> Result<usize> {
        let tree = self.db.open_tree(VECTORS_TREE)?;
        Ok(tree.len())
    }

    // ========== Metadata Operations ==========

    pub fn save_summary(&self, summary: &RunSummary) -> Result<()> {
        let tree = self.db.open_tree(METADATA_TREE)?;
        tree.insert(SUMMARY_KEY, bincode::serialize(summary)?)?;
        Ok(())
    }

    pub fn load_summary(&self) -> Result<Option<RunSummary>> {
        let tree = self.db.open_tree(METADATA_TREE)?;
        match tree.get(SUMMARY_KEY)? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    /// Flush all changes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all data
    pub fn clear(&self) -> Result<()> {
        self.db.drop_tree(VECTORS_TREE)?;
        self.db.drop_tree(METADATA_TREE)?;
        Ok(())
    }
}

fn decode_doc_id(key: &[u8]) -> Result<DocId> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        Error::MalformedVector(format!("vector key of {} bytes is not a document id", key.len()))
    })?;
    Ok(DocId::from_be_bytes(bytes))
}
