//! musiclib command-line application
//!
//! Catalog maintenance commands (`create`, `refresh`, `tags`, `encode`) and a
//! read-only JSON query service (`serve`) over the persisted catalog.
//!
//! This library exposes the components for testing purposes.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{AppConfig, EncoderConfig};
pub use error::{AppError, Result};
pub use services::encoder::{EncodeStats, EncoderService};
pub use state::AppState;
