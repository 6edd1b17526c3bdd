use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prowlarr_engine_core::searcher::{DISPLAY_NAME, ENGINE_NAME};
use prowlarr_engine_core::{
    capabilities_xml, default_config_path, load_engine_config, Category, NovaPrinter,
    ProwlarrEngine, SanitizedConfig,
};

/// Prowlarr search engine for the qBittorrent search host.
///
/// Results are written to stdout in the host's line format; logs go to
/// stderr.
#[derive(Parser)]
#[command(name = "prowlarr-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: prowlarr.json next to the executable)
    #[arg(short, long, global = true, env = "PROWLARR_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search Prowlarr and print one result line per release
    Search {
        /// all, anime, books, games, movies, music, software or tv
        category: Category,

        /// Search keywords, possibly percent-encoded; may start with `-`
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        keywords: Vec<String>,
    },

    /// Resolve a result link to a magnet link or a local .torrent file
    Download {
        url: String,
    },

    /// Print the engine capabilities
    Capabilities,

    /// Show the resolved configuration (API key hidden)
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // stdout belongs to the host, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    debug!("Loading configuration from {:?}", config_path);
    let config = load_engine_config(&config_path);

    let mut printer = NovaPrinter::stdout();

    match cli.command {
        Commands::Search { category, keywords } => {
            let engine =
                ProwlarrEngine::from_config(config).context("Failed to create HTTP client")?;
            let what = keywords.join(" ");

            match engine.search(&what, category, &mut printer).await {
                Ok(count) => debug!(results = count, "Search finished"),
                // Already reported to the host as an error row.
                Err(e) if e.is_reportable() => warn!("Search failed: {}", e),
                Err(e) => return Err(e).context("Search failed"),
            }
        }
        Commands::Download { url } => {
            let engine =
                ProwlarrEngine::from_config(config).context("Failed to create HTTP client")?;
            engine
                .download_torrent(&url, &mut printer)
                .await
                .with_context(|| format!("Failed to download {}", url))?;
        }
        Commands::Capabilities => {
            println!(
                "{}",
                capabilities_xml(ENGINE_NAME, DISPLAY_NAME, config.config.base_url())
            );
        }
        Commands::Config => {
            let sanitized = SanitizedConfig::from(&config);
            let json = serde_json::to_string_pretty(&sanitized)
                .context("Failed to serialize configuration")?;
            println!("{}", json);
        }
    }

    Ok(())
}
