//! YAML snapshots of a scanned record collection

use crate::{ImportError, Result};
use musiclib_core::{sort_records, TagRecord};
use std::fs;
use std::path::Path;

/// Write `records` to `path` as a YAML sequence.
pub fn save_snapshot(path: &Path, records: &[TagRecord]) -> Result<()> {
    let yaml = serde_yaml::to_string(records)?;
    fs::write(path, yaml)?;
    tracing::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read a snapshot written by [`save_snapshot`], returning records in sorted order.
pub fn load_snapshot(path: &Path) -> Result<Vec<TagRecord>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let yaml = fs::read_to_string(path)?;
    let mut records: Vec<TagRecord> = serde_yaml::from_str(&yaml)?;
    sort_records(&mut records);
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
