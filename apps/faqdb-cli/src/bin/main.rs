use clap::{Parser, Subcommand};

use faqdb_core::config::{expand_path, Settings};
use faqdb_core::corpus::load_corpus;
use faqdb_core::telemetry;
use faqdb_core::types::ContextRequest;
use faqdb_rag::{Services, Tool};
use faqdb_vector::VectorStore;

#[derive(Debug, Parser)]
#[command(name = "faqdb", version, about = "Retrieval-augmented FAQ store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Embed a corpus file and upsert it into the collection
    Ingest {
        /// Corpus JSON file (defaults to `corpus.path` from config)
        #[arg(long)]
        corpus: Option<String>,
    },
    /// Run one retrieval and print the JSON the tool would return
    Query {
        query: String,
        /// Restrict results to this locality
        #[arg(long)]
        city: Option<String>,
        /// Request filtering even without --city (exercises the filter rules)
        #[arg(long)]
        filter: bool,
        /// Print similarity scores instead of the tool JSON
        #[arg(long)]
        scores: bool,
    },
    /// Execute the `get_context` tool with raw argument JSON
    Call { arguments: String },
    /// Show collection size and ingestion record
    Status,
    /// Print the tool definition handed to the orchestrator
    ToolSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    telemetry::init(&settings.log);

    match cli.command {
        Command::Status => print_status(&Services::open_store(&settings).await?).await?,
        Command::Ingest { corpus } => {
            let services = Services::from_settings(settings).await?;
            let path = corpus.as_deref().map_or_else(|| services.settings.corpus_path(), expand_path);
            println!("Ingesting from {}", path.display());
            let corpus = load_corpus(&path)?;
            let report = services.indexer().with_progress(true).index_corpus(&corpus).await?;
            println!("✅ Ingest complete ({} records, collection '{}')", report.records, report.collection);
        }
        Command::Query { query, city, filter, scores } => {
            let request = ContextRequest { query, filter: filter || city.is_some(), city };
            let retriever = Services::from_settings(settings).await?.retriever().await?;
            if scores {
                let hits = retriever.search(&request).await?;
                println!("🔍 Found {} results", hits.len());
                for (i, hit) in hits.iter().enumerate() {
                    println!("\n  {}. score={:.4}  id={}  locality={}", i + 1, hit.score, hit.id, hit.payload.locality);
                    println!("     📝 {}", hit.payload.answer);
                }
            } else {
                println!("{}", retriever.query_json(&request).await?);
            }
        }
        Command::Call { arguments } => {
            let tool = Services::from_settings(settings).await?.context_tool().await?;
            println!("{}", tool.execute(&arguments).await?);
        }
        Command::ToolSchema => {
            let tool = Services::from_settings(settings).await?.context_tool().await?;
            println!("{}", serde_json::to_string_pretty(&tool.definition())?);
        }
    }
    Ok(())
}

async fn print_status(store: &VectorStore) -> anyhow::Result<()> {
    if !store.exists().await? {
        println!("Collection '{}' has not been created yet", store.collection());
        return Ok(());
    }
    println!("Collection: {}", store.collection());
    println!("Records: {}", store.count().await?);
    println!("Dimension: {}", store.dimension().await?);
    match store.info().await? {
        Some(info) => {
            println!("Metric: {}", info.metric);
            println!("Embedder: {}", info.embedder_id);
            println!("Corpus fingerprint: {}", info.corpus_fingerprint);
            println!("Indexed at: {}", info.indexed_at);
        }
        None => println!("No ingestion record"),
    }
    Ok(())
}
