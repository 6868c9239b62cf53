//! `sitesearch` binary: serve the search API, or run one-shot queries and
//! index inspections against a content directory.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitesearch::{DirSource, QueryOptions, SearchConfig, SearchService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sitesearch", about = "Full-text search service for content sites", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP search API
    Serve {
        /// Directory containing exported content (posts.json, docs.json, links.json)
        #[arg(long)]
        content_dir: PathBuf,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
        /// Optional JSON config file (weights, staleness, limits)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a single query against a content directory and print the results
    Search {
        query: String,
        #[arg(long)]
        content_dir: PathBuf,
        /// Restrict to one category (blog, docs, links)
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Build the index and print a summary of its shape
    Inspect {
        #[arg(long)]
        content_dir: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(SearchConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            content_dir,
            bind,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            tracing::info!(
                content_dir = %content_dir.display(),
                staleness_secs = config.staleness_secs,
                "starting sitesearch"
            );
            let service = Arc::new(SearchService::new(DirSource::new(content_dir), config));
            // Warm the index before accepting traffic; a failure here is
            // logged but not fatal, the service retries on first use.
            if let Err(e) = service.rebuild() {
                tracing::warn!(error = %e, "initial index build failed, starting cold");
            }
            sitesearch::serve(bind, service)
                .await
                .context("search API server failed")?;
        }
        Commands::Search {
            query,
            content_dir,
            kind,
            limit,
        } => {
            let service = SearchService::new(DirSource::new(content_dir), SearchConfig::default());
            let opts = QueryOptions { kind, limit };
            let response = service.search(&query, &opts)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Inspect { content_dir } => {
            let service = SearchService::new(DirSource::new(content_dir), SearchConfig::default());
            let summary = service.index_summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
