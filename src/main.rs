//! CocoSearch CLI - semantic, keyword, and hybrid code search.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duckdb::Connection;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cocosearch::application::{IndexRepositoryUseCase, ParseHealthUseCase, SearchCodeUseCase};
use cocosearch::connector::cache::QueryCache;
use cocosearch::connector::embedding::{DeterministicEmbeddingClient, HttpEmbeddingClient, DEFAULT_EMBEDDING_ENDPOINT};
use cocosearch::connector::storage::{DuckdbChunkStore, DuckdbFileHashStore, DuckdbIndexStore, DuckdbParseHealthStore};
use cocosearch::domain::models::{EmbeddingConfig, SearchFilters, SearchQuery};

#[derive(Parser)]
#[command(name = "cocosearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the DuckDB data file.
    #[arg(short, long, global = true, default_value = "~/.cocosearch/cocosearch.db")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a repository under the given index name.
    Index {
        /// Index name (must match ^[a-z0-9_]+$).
        name: String,
        /// Path to the repository to index.
        path: String,
        /// Force a full re-index instead of an incremental pass.
        #[arg(short, long)]
        force: bool,
    },

    /// Search an index.
    Search {
        /// Index name.
        index: String,
        /// The search query.
        query: String,
        #[arg(short, long, default_value = "10")]
        limit: usize,
        #[arg(short, long, default_value = "0.3")]
        min_score: f32,
        #[arg(short = 'L', long)]
        language: Option<Vec<String>>,
        /// Force hybrid search on, regardless of the auto decision.
        #[arg(long)]
        hybrid: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db_path = expand_tilde(&cli.data_dir);
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&db_path).context("failed to open DuckDB database")?;
    let conn = Arc::new(AsyncMutex::new(conn));

    let chunk_store = Arc::new(DuckdbChunkStore::new(conn.clone()));
    let file_hash_store = Arc::new(DuckdbFileHashStore::new(conn.clone()).await?);
    let index_store = Arc::new(DuckdbIndexStore::new(conn.clone()));
    index_store.ensure_schema().await?;
    let parse_health_store = Arc::new(DuckdbParseHealthStore::new(conn.clone()));

    let embedding_config = EmbeddingConfig::new(
        std::env::var("COCOSEARCH_EMBEDDING_MODEL").unwrap_or_else(|_| "cocosearch-embed".to_string()),
        768,
        512,
    );
    let embedding_service: Arc<dyn cocosearch::application::EmbeddingService> = match std::env::var("COCOSEARCH_EMBEDDING_ENDPOINT") {
        Ok(endpoint) => Arc::new(HttpEmbeddingClient::new(endpoint, embedding_config)),
        Err(_) => {
            if cli.verbose {
                info!("COCOSEARCH_EMBEDDING_ENDPOINT not set, falling back to {DEFAULT_EMBEDDING_ENDPOINT}");
            }
            Arc::new(DeterministicEmbeddingClient::new(embedding_config))
        }
    };

    let search_use_case = SearchCodeUseCase::new(chunk_store.clone(), embedding_service.clone());
    let cache: Arc<QueryCache> = search_use_case.cache();

    match cli.command {
        Commands::Index { name, path, force } => {
            let index_use_case = IndexRepositoryUseCase::new(
                chunk_store,
                file_hash_store,
                index_store,
                embedding_service,
                cache,
            );
            let stats = index_use_case.execute(&name, &path, force).await?;
            println!(
                "Indexed {name}: {} insertions, {} updates, {} deletions",
                stats.num_insertions, stats.num_updates, stats.num_deletions
            );

            let parse_health = ParseHealthUseCase::new(parse_health_store);
            let files = collect_indexed_files(&path).await?;
            parse_health.execute(&name, &files).await?;
        }

        Commands::Search {
            index,
            query,
            limit,
            min_score,
            language,
            hybrid,
        } => {
            let mut search_query = SearchQuery::new(index, query)
                .with_limit(limit)
                .with_min_score(min_score)
                .with_hybrid(hybrid);

            if let Some(languages) = language {
                search_query = search_query.with_filters(SearchFilters {
                    languages,
                    ..Default::default()
                });
            }

            let results = search_use_case.execute(search_query).await?;

            if results.is_empty() {
                println!("No results found.");
            } else {
                println!("Found {} results:\n", results.len());
                for (i, result) in results.iter().enumerate() {
                    println!(
                        "{}. {}:{}-{} (score: {:.3}, {:?})",
                        i + 1,
                        result.chunk.file_path,
                        result.chunk.location.start_line,
                        result.chunk.location.end_line,
                        result.score,
                        result.match_type,
                    );
                    if let Some(symbol) = &result.chunk.symbol {
                        println!("   Symbol: {} ({})", symbol.name, symbol.kind.as_str());
                    }
                    let preview: String = result
                        .chunk
                        .content
                        .lines()
                        .take(3)
                        .map(|l| format!("   | {l}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    println!("{preview}\n");
                }
            }
        }
    }

    Ok(())
}

/// Re-walks the just-indexed tree to hand the parse-health pass file
/// contents, per spec §4.9 step 1.
async fn collect_indexed_files(repo_path: &str) -> Result<Vec<(String, String)>> {
    let absolute_path = PathBuf::from(repo_path).canonicalize()?;
    let mut files = Vec::new();
    for entry in ignore::WalkBuilder::new(&absolute_path)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
    {
        let relative = entry
            .path()
            .strip_prefix(&absolute_path)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .to_string();
        if let Ok(content) = tokio::fs::read_to_string(entry.path()).await {
            files.push((relative, content));
        }
    }
    Ok(files)
}

fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
