use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tfidf_weights::{
    source, Document, JsonLinesSink, Pipeline, PipelineConfig, PipelineOutput, StopWords, TextSink,
    VectorSink, VectorStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `<docId> WeightVector[[terms],[weights]]` per line
    Text,
    /// One JSON object per line
    Json,
}

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "TF-IDF weight vectors per document", long_about = None)]
struct Args {
    /// Corpus file, gzip file or directory with `<docId>,<text>` lines
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the weight vectors
    #[arg(short, long)]
    output: PathBuf,

    /// Corpus size used in the IDF term (defaults to the number of documents read)
    #[arg(long)]
    total_docs: Option<u64>,

    /// Worker threads, 0 lets the pool decide
    #[arg(short, long, default_value_t = 0)]
    parallelism: usize,

    /// File with one stop-word per line, replacing the built-in list
    #[arg(long)]
    stop_words: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also persist encoded vectors into a sled database at this path
    #[arg(long)]
    store: Option<PathBuf>,
}

/// Run the pipeline, or produce an empty result when the corpus has no documents
fn compute(args: &Args, docs: &[Document]) -> Result<PipelineOutput> {
    if docs.is_empty() {
        tracing::warn!("Corpus {} contains no documents; writing empty output", args.input.display());
        return Ok(PipelineOutput::empty(args.total_docs.unwrap_or(0)));
    }

    let total_docs = match args.total_docs {
        Some(n) => n,
        None => {
            tracing::info!("Using document count {} as total_docs", docs.len());
            docs.len() as u64
        }
    };

    let stop_words = match &args.stop_words {
        Some(path) => StopWords::from_file(path)
            .with_context(|| format!("Failed to load stop-words from {}", path.display()))?,
        None => StopWords::default(),
    };

    let config = PipelineConfig::new(total_docs)
        .with_parallelism(args.parallelism)
        .with_stop_words(stop_words);
    let pipeline = Pipeline::new(config).context("Failed to configure pipeline")?;
    pipeline.run(docs).context("TF-IDF computation failed")
}

/// Write vectors to the output file in the requested format
fn write_output(args: &Args, output: &PipelineOutput) -> Result<()> {
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let writer = BufWriter::new(file);
    match args.format {
        OutputFormat::Text => TextSink::new(writer).write_all(&output.vectors)?,
        OutputFormat::Json => JsonLinesSink::new(writer).write_all(&output.vectors)?,
    }
    tracing::info!("Wrote {} vectors to {}", output.vectors.len(), args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let start = Instant::now();

    let docs = source::read_corpus(&args.input)
        .with_context(|| format!("Failed to read corpus from {}", args.input.display()))?;
    tracing::info!("Loaded {} documents in {:?}", docs.len(), start.elapsed());

    let output = compute(&args, &docs)?;

    write_output(&args, &output)?;

    if let Some(path) = &args.store {
        let mut store = VectorStore::open(path)
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        store.clear()?;
        store.write_all(&output.vectors)?;
        store.save_summary(&output.summary)?;
        store.flush()?;
        tracing::info!("Stored {} vectors in {}", store.count()?, path.display());
    }

    if output.summary.unmatched_entries > 0 {
        tracing::info!(
            "{} term-frequency entries had no document frequency (stop-words)",
            output.summary.unmatched_entries
        );
    }
    tracing::info!("Finished in {:?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir) -> Args {
        Args::parse_from([
            "tfidf-weights",
            "--input",
            dir.path().join("corpus.txt").to_str().unwrap(),
            "--output",
            dir.path().join("weights.txt").to_str().unwrap(),
        ])
    }

    #[test]
    fn test_empty_corpus_writes_empty_output() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("corpus.txt"), "\n\n")?;
        let args = args(&dir);

        let docs = source::read_corpus(&args.input)?;
        let output = compute(&args, &docs)?;
        assert!(output.vectors.is_empty());

        write_output(&args, &output)?;
        assert_eq!(std::fs::read_to_string(&args.output)?, "");
        Ok(())
    }

    #[test]
    fn test_total_docs_defaults_to_document_count() -> Result<()> {
        let dir = TempDir::new()?;
        let args = args(&dir);
        let docs = source::parse_lines(["1,Big Big Big Data", "2,Hello Big Data"])?;

        let output = compute(&args, &docs)?;
        assert_eq!(output.summary.total_docs, 2);
        assert_eq!(output.vectors.len(), 2);
        Ok(())
    }
}
