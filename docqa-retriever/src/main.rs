use anyhow::Context;
use clap::{Parser, Subcommand};
use docqa_embed::OpenAiEmbeddingProvider;
use docqa_retriever::{
    AnswerGenerator, AppConfig, ChatClient, Collection, IngestPipeline, RepositoryConfig,
    Retriever, VectorStore,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Retrieval-augmented question answering over a document collection.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "docqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, chunk, embed, and store a document
    Ingest {
        /// Document to ingest (.txt, .pdf, .docx, .doc)
        file: PathBuf,
        /// Treat the file as a temporary upload and delete it afterwards
        #[arg(long)]
        temp: bool,
    },
    /// Ask a question against the collection
    Query {
        /// The question text
        text: String,
        /// Number of chunks to retrieve (overrides the config file)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Show collection statistics
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;

    match args.command {
        Commands::Ingest { file, temp } => {
            let embedder = Arc::new(OpenAiEmbeddingProvider::new(config.embed_config())?);
            let collection = Collection::open(&config.collection_path).await?;
            let pipeline =
                IngestPipeline::new(config.splitter(), VectorStore::new(collection, embedder));

            let report = if temp {
                pipeline.ingest_temp_file(&file).await?
            } else {
                pipeline.ingest_file(&file).await?
            };
            println!(
                "Ingested {}: {} unit(s), {} chunk(s)",
                file.display(),
                report.units,
                report.chunks
            );
        }
        Commands::Query { text, top_k } => {
            let embedder = Arc::new(OpenAiEmbeddingProvider::new(config.embed_config())?);
            let repo = RepositoryConfig::new(&config.collection_path)
                .with_top_k(top_k.unwrap_or(config.top_k));
            let retriever = Retriever::open(&repo, embedder).await?;

            let chunks = retriever.retrieve(&text).await?;
            let generator =
                AnswerGenerator::new(Arc::new(ChatClient::new(config.llm_config())?));
            let answer = generator.generate(&text, &chunks).await?;

            println!("{answer}");
            if !chunks.is_empty() {
                println!();
                println!("Sources:");
                for chunk in &chunks {
                    println!(
                        "  {} (unit {}, chunk {})",
                        chunk.source, chunk.unit_index, chunk.chunk_index
                    );
                }
            }
        }
        Commands::Stats => {
            let collection = Collection::open(&config.collection_path).await?;
            let stats = collection.stats().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("serializing stats")?
            );
        }
    }

    Ok(())
}
