//! musiclib storage
//!
//! `SQLite` persistence for the artist/album/song catalog.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `artists`, `albums` and `songs` each own their queries
//! - **[`SqliteCatalog`]**: the [`CatalogStore`](musiclib_core::CatalogStore) used in production
//! - **[`MemoryCatalog`]**: an in-process store with the same semantics, for tests and dry runs
//!
//! # Example
//!
//! ```rust,no_run
//! use musiclib_storage::{create_pool, run_migrations, SqliteCatalog};
//! use musiclib_core::CatalogStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://musiclib.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteCatalog::new(pool);
//! let artists = store.list_artists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod albums;
pub mod artists;
pub mod songs;

pub use context::SqliteCatalog;
pub use error::{Result, StorageError};
pub use memory::MemoryCatalog;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup so the schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://musiclib.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
