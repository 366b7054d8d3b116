use tfidf_weights::{Pipeline, PipelineConfig, StopWords, TextSink, VectorSink, VectorStore, WeightVector};

fn main() -> anyhow::Result<()> {
    println!("=== TF-IDF Weights Basic Usage Example ===\n");

    let lines = [
        "1,Big Hello to Stratosphere! :-)",
        "2,Hello to Big Big Data.",
        "3,Gartner's definition (the 3Vs) is still widely used",
    ];

    // Example 1: Run the whole pipeline
    println!("--- Example 1: Weight vectors for {} documents ---", lines.len());
    let pipeline = Pipeline::new(PipelineConfig::new(lines.len() as u64))?;
    let output = pipeline.run_lines(lines)?;

    let mut sink = TextSink::new(std::io::stdout());
    sink.write_all(&output.vectors)?;

    // Example 2: Inspect one stage at a time
    println!("\n--- Example 2: Document frequencies ---");
    let docs = tfidf_weights::source::parse_lines(lines)?;
    for entry in pipeline.document_frequencies(&docs).entries() {
        println!("  {:<14} {}", entry.term, entry.doc_count);
    }

    // Example 3: Custom stop-words
    println!("\n--- Example 3: Stop-words 'big', 'hello' and 'to' ---");
    let stop_words: StopWords = ["big", "hello", "to"].into_iter().collect();
    let pipeline = Pipeline::new(PipelineConfig::new(3).with_stop_words(stop_words))?;
    let output = pipeline.run_lines(lines)?;
    for vector in &output.vectors {
        println!("  {} -> {}", vector.doc_id(), vector);
    }

    // Example 4: Binary encoding
    println!("\n--- Example 4: Encode and decode ---");
    let vector = &output.vectors[0];
    let bytes = vector.encode()?;
    let decoded = WeightVector::decode(vector.doc_id(), &bytes)?;
    println!("  {} bytes, round trip equal: {}", bytes.len(), decoded == *vector);

    // Example 5: Persist
    println!("\n--- Example 5: Vector store ---");
    let store = VectorStore::in_memory()?;
    store.save_vectors(&output.vectors)?;
    store.save_summary(&output.summary)?;
    println!("  Stored vectors: {}", store.count()?);
    println!("  Summary: {:?}", store.load_summary()?);

    println!("\n=== Example Complete ===");

    Ok(())
}
