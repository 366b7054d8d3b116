use crate::error::Result;
use crate::storage::VectorStore;
use crate::vector::WeightVector;
use std::io::Write;

/// Destination for finished weight vectors, one record per document
pub trait VectorSink {
    fn write(&mut self, vector: &WeightVector) -> Result<()>;

    /// Flush buffered records
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_all(&mut self, vectors: &[WeightVector]) -> Result<()> {
        for vector in vectors {
            self.write(vector)?;
        }
        self.finish()
    }
}

/// `<docId> WeightVector[[terms],[weights]]` per line
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> VectorSink for TextSink<W> {
    fn write(&mut self, vector: &WeightVector) -> Result<()> {
        writeln!(self.writer, "{} {}", vector.doc_id(), vector)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> VectorSink for JsonLinesSink<W> {
    fn write(&mut self, vector: &WeightVector) -> Result<()> {
        serde_json::to_writer(&mut self.writer, vector)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl VectorSink for VectorStore {
    fn write(&mut self, vector: &WeightVector) -> Result<()> {
        self.save_vector(vector)
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> Vec<WeightVector> {
        let mut first = WeightVector::new(1);
        first.add("big", 0.0);
        first.add("data", 0.0);
        let mut second = WeightVector::new(2);
        second.add("hello", 0.5);
        vec![first, second]
    }

    #[test]
    fn test_text_sink() -> Result<()> {
        let mut sink = TextSink::new(Vec::new());
        sink.write_all(&vectors())?;
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "1 WeightVector[[big, data],[0.0, 0.0]]\n2 WeightVector[[hello],[0.5]]\n"
        );
        Ok(())
    }

    #[test]
    fn test_json_lines_sink() -> Result<()> {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_all(&vectors())?;
        let out = String::from_utf8(sink.into_inner()).unwrap();

        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["doc_id"], 2);
        assert_eq!(lines[1]["terms"][0], "hello");
        assert_eq!(lines[1]["weights"][0], 0.5);
        Ok(())
    }

    #[test]
    fn test_store_sink() -> Result<()> {
        let mut store = VectorStore::in_memory()?;
        store.write_all(&vectors())?;
        assert_eq!(store.count()?, 2);
        assert_eq!(store.get_vector(2)?.unwrap().get("hello"), Some(0.5));
        Ok(())
    }
}
