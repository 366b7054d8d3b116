use crate::document::Document;
use crate::error::Result;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse `"<docId>,<text>"` lines, skipping blank ones
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Document>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|l| !l.as_ref().trim().is_empty())
        .map(|l| Document::parse_line(l.as_ref()))
        .collect()
}

/// Read documents from any buffered reader
pub fn read_documents<R: BufRead>(reader: R) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        docs.push(Document::parse_line(&line)?);
    }
    Ok(docs)
}

/// Load a corpus from a file, a gzip file (`.gz`) or a directory of such files
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    if !path.is_dir() {
        return read_file(path);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    files.retain(|p| p.is_file());
    files.sort();

    let mut docs = Vec::new();
    for file in &files {
        docs.extend(read_file(file)?);
    }
    tracing::debug!("read {} documents from {} files in {}", docs.len(), files.len(), path.display());
    Ok(docs)
}

fn read_file(path: &Path) -> Result<Vec<Document>> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    read_documents(BufReader::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn test_read_documents_skips_blank_lines() -> Result<()> {
        let input = "1,Big Big Big Data\n\n2,Hello Big Data\n";
        let docs = read_documents(Cursor::new(input))?;
        assert_eq!(docs, vec![
            Document::new(1, "Big Big Big Data"),
            Document::new(2, "Hello Big Data"),
        ]);
        Ok(())
    }

    #[test]
    fn test_read_documents_propagates_malformed_line() {
        let input = "1,fine\nbroken line\n";
        let err = read_documents(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref line, .. } if line == "broken line"));
    }

    #[test]
    fn test_parse_lines() -> Result<()> {
        let docs = parse_lines(["1,a b", "  ", "2,c"])?;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id, 2);
        Ok(())
    }
}
