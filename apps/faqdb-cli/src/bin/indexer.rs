use std::path::PathBuf;

use clap::Parser;
use faqdb_core::config::{expand_path, Settings};
use faqdb_core::corpus::load_corpus;
use faqdb_core::telemetry;
use faqdb_rag::Services;

/// Build the FAQ vector collection from a corpus file.
#[derive(Debug, Parser)]
#[command(name = "faqdb-indexer", version)]
struct Args {
    /// Corpus JSON file (defaults to `corpus.path` from config)
    corpus: Option<String>,
    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    telemetry::init(&settings.log);

    let corpus_path: PathBuf = args.corpus.as_deref().map_or_else(|| settings.corpus_path(), expand_path);
    println!("FAQ Indexer\n===========");
    println!("Corpus: {}", corpus_path.display());
    println!("Store: {} (collection '{}')", settings.store_path().display(), settings.store.collection);

    let corpus = load_corpus(&corpus_path)?;
    let services = Services::from_settings(settings).await?;
    let report = services.indexer().with_progress(!args.quiet).index_corpus(&corpus).await?;

    println!("\n✅ Indexing completed");
    println!("📊 {} records in '{}'{}", report.records, report.collection, if report.created { " (new collection)" } else { "" });
    if let Some(dim) = report.dimension { println!("📐 Vector dimension: {}", dim); }
    println!("\n💡 To query, use: cargo run --bin faqdb -- query '<question>' --city <City>");
    Ok(())
}
