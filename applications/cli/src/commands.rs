/// Command implementations shared by the binary and tests
use crate::{
    api,
    config::AppConfig,
    error::{AppError, Result},
    services::{EncodeStats, EncoderService},
    state::AppState,
};
use musiclib_core::{CatalogStore, TagRecord};
use musiclib_importer::{
    snapshot::{load_snapshot, save_snapshot},
    LibraryScanner, Reconciler, RefreshStats, ScanReport,
};
use musiclib_storage::SqliteCatalog;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open the configured database, applying migrations.
pub async fn open_store(config: &AppConfig) -> Result<Arc<SqliteCatalog>> {
    let pool = musiclib_storage::create_pool(&config.database_url).await?;
    musiclib_storage::run_migrations(&pool).await?;
    tracing::debug!("Database connected: {}", config.database_url);
    Ok(Arc::new(SqliteCatalog::new(pool)))
}

pub fn scanner(config: &AppConfig) -> LibraryScanner {
    let scanner = LibraryScanner::new(config.fingerprint).parallel(config.parallel);
    match config.workers {
        Some(workers) => scanner.workers(workers),
        None => scanner,
    }
}

/// Scan the music directory off the async runtime.
pub async fn scan(config: &AppConfig) -> Result<ScanReport> {
    let scanner = scanner(config);
    let root = config.music_dir.clone();
    let report = tokio::task::spawn_blocking(move || scanner.scan(&root))
        .await
        .map_err(|e| AppError::Internal(format!("Scan task failed: {}", e)))??;

    for warning in report.warnings.iter().filter(|w| w.fatal) {
        tracing::warn!("Skipped {}: {}", warning.relative_path, warning.message);
    }
    Ok(report)
}

/// Create (or recreate) the catalog from the music directory or a snapshot.
pub async fn create(
    config: &AppConfig,
    store: Arc<dyn CatalogStore>,
    save: Option<&Path>,
    load: Option<&Path>,
) -> Result<RefreshStats> {
    let records: Vec<TagRecord> = match load {
        Some(path) => load_snapshot(path)?,
        None => {
            tracing::info!("Creating catalog from {}", config.music_dir.display());
            scan(config).await?.records
        }
    };

    if let Some(path) = save {
        save_snapshot(path, &records)?;
    }

    let stats = Reconciler::new(store).rebuild(&records).await?;
    Ok(stats)
}

/// Reconcile the persisted catalog with the music directory.
pub async fn refresh(config: &AppConfig, store: Arc<dyn CatalogStore>) -> Result<RefreshStats> {
    tracing::info!("Refreshing catalog from {}", config.music_dir.display());
    let report = scan(config).await?;
    let stats = Reconciler::new(store)
        .reextract_moved(config.reextract_moved)
        .refresh(&report.records)
        .await?;
    Ok(stats)
}

/// Expand `*.list` arguments into the files they name, one per line.
pub fn expand_tag_args(args: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args {
        if arg.extension().is_some_and(|ext| ext == "list") {
            let contents = std::fs::read_to_string(arg)?;
            paths.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(PathBuf::from),
            );
        } else {
            paths.push(arg.clone());
        }
    }
    Ok(paths)
}

/// Decoded raw tags of one file, as printable lines.
pub fn tag_lines(path: &Path) -> Result<Vec<String>> {
    let raw = musiclib_tags::read_file(path)?;
    let mut lines: Vec<String> = raw
        .tags
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect();
    if let Some(duration) = &raw.duration {
        lines.push(format!("duration: {}", duration));
    }
    for warning in &raw.warnings {
        lines.push(format!("warning: {}", warning));
    }
    Ok(lines)
}

/// Print the decoded tags of every file; unreadable files are reported and skipped.
pub fn tags(args: &[PathBuf]) -> Result<()> {
    for path in expand_tag_args(args)? {
        println!("{}", path.display());
        match tag_lines(&path) {
            Ok(lines) => {
                for line in lines {
                    println!("  {}", line);
                }
            }
            Err(e) => tracing::warn!("Cannot read tags from {}: {}", path.display(), e),
        }
    }
    Ok(())
}

pub async fn encode(config: &AppConfig, store: &dyn CatalogStore) -> Result<EncodeStats> {
    EncoderService::from_config(config).encode_all(store).await
}

/// Run the query service until the process is stopped.
pub async fn serve(config: &AppConfig, store: Arc<dyn CatalogStore>) -> Result<()> {
    let app = api::create_router(AppState::new(store));

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| AppError::Config(format!("Invalid host: {}", e)))?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
