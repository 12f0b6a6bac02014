/// musiclib - audio library catalog maintenance
use clap::{Parser, Subcommand};
use musiclib_cli::{commands, AppConfig};
use musiclib_core::CatalogStore;
use musiclib_storage::SqliteCatalog;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "musiclib")]
#[command(about = "Catalog an audio library and keep it in sync", long_about = None)]
struct Cli {
    /// Configuration file path (default: musiclib.yaml when present)
    #[arg(short, long, global = true, env = "MUSICLIB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create (or recreate) the catalog
    Create {
        /// Save the scanned records to a YAML snapshot
        #[arg(long)]
        save: Option<PathBuf>,
        /// Build from a YAML snapshot instead of scanning
        #[arg(long, conflicts_with = "save")]
        load: Option<PathBuf>,
    },
    /// Reconcile the catalog with the music directory
    Refresh,
    /// Print the raw tags of files (a .list file names one file per line)
    Tags {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Bring the encoded mirror up to date
    Encode,
    /// Start the HTTP query service
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "musiclib=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Create { save, load } => {
            let (config, store) = open(config_path).await?;
            if load.is_none() {
                config.validate()?;
            }
            let stats =
                commands::create(&config, store, save.as_deref(), load.as_deref()).await?;
            println!("Created catalog with {} songs", stats.added);
        }
        Commands::Refresh => {
            let (config, store) = open(config_path).await?;
            config.validate()?;
            let stats = commands::refresh(&config, store).await?;
            println!("{}", stats);
        }
        Commands::Tags { files } => {
            commands::tags(&files)?;
        }
        Commands::Encode => {
            let (config, store) = open(config_path).await?;
            config.validate()?;
            let stats = commands::encode(&config, store.as_ref()).await?;
            println!(
                "{} copied, {} encoded, {} already current, {} without encoder",
                stats.copied, stats.encoded, stats.current, stats.skipped
            );
        }
        Commands::Serve => {
            let (config, store) = open(config_path).await?;
            let store: Arc<dyn CatalogStore> = store;
            commands::serve(&config, store).await?;
        }
    }

    Ok(())
}

/// Load configuration and open the catalog database.
async fn open(config_path: Option<&Path>) -> anyhow::Result<(AppConfig, Arc<SqliteCatalog>)> {
    let config = AppConfig::load(config_path)?;
    let store = commands::open_store(&config).await?;
    Ok((config, store))
}
