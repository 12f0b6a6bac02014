//! Whole-library scan
//!
//! Walks a music root, extracts and normalizes every supported file, and
//! collects the canonical records into a sorted collection. Per-file failures
//! are reported as [`ScanWarning`]s; only an unusable root fails the scan.

use crate::{
    fingerprint::FingerprintStrategy,
    normalize::KeyNormalizer,
    scanner::{base_path, relative_path, FileScanner},
    ImportError, Result,
};
use musiclib_core::{sort_records, CanonicalKey, TagRecord};
use musiclib_tags::AudioFormat;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Flag value marking a song as eligible for encoding
const DEFAULT_FLAGS: &str = "e";

/// A per-file problem met during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub relative_path: String,
    pub message: String,
    /// The file produced no record
    pub fatal: bool,
}

/// Statistics from a library scan
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub total_files: usize,
    pub records: usize,
    pub skipped: usize,
    /// Records emitted with at least one required key missing
    pub incomplete: usize,
    pub elapsed: Duration,
}

/// Records and warnings produced by [`LibraryScanner::scan`]
#[derive(Debug, Default, Clone)]
pub struct ScanReport {
    /// Sorted by relative path, then fingerprint
    pub records: Vec<TagRecord>,
    pub warnings: Vec<ScanWarning>,
    pub stats: ScanStats,
}

/// Outcome of extracting a single file
struct FileOutcome {
    record: Option<TagRecord>,
    incomplete: bool,
    warnings: Vec<ScanWarning>,
}

/// Library scanner for a music root
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    strategy: FingerprintStrategy,
    normalizer: KeyNormalizer,
    files: FileScanner,
    /// Run per-file extraction on a worker pool
    parallel: bool,
    workers: usize,
}

impl Default for LibraryScanner {
    fn default() -> Self {
        Self::new(FingerprintStrategy::default())
    }
}

impl LibraryScanner {
    /// Create a new library scanner
    pub fn new(strategy: FingerprintStrategy) -> Self {
        Self {
            strategy,
            normalizer: KeyNormalizer::new(),
            files: FileScanner::new(),
            parallel: false,
            workers: num_cpus::get(),
        }
    }

    /// Set whether to extract files on a worker pool (default: false)
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the worker pool size (default: number of CPUs)
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Replace the file walker (depth, symlink handling)
    pub fn file_scanner(mut self, files: FileScanner) -> Self {
        self.files = files;
        self
    }

    pub fn strategy(&self) -> FingerprintStrategy {
        self.strategy
    }

    /// Scan `root` into a sorted record collection.
    pub fn scan(&self, root: &Path) -> Result<ScanReport> {
        let start_time = Instant::now();
        let paths = self.files.scan_directory(root)?;

        tracing::info!("Scanning {} audio files under {}", paths.len(), root.display());

        let outcomes = if self.parallel && paths.len() > 1 {
            self.extract_parallel(root, &paths)?
        } else {
            paths.iter().map(|path| self.extract_file(root, path)).collect()
        };

        let mut report = ScanReport {
            stats: ScanStats {
                total_files: paths.len(),
                ..Default::default()
            },
            ..Default::default()
        };

        for outcome in outcomes {
            if outcome.incomplete {
                report.stats.incomplete += 1;
            }
            match outcome.record {
                Some(record) => report.records.push(record),
                None => report.stats.skipped += 1,
            }
            report.warnings.extend(outcome.warnings);
        }

        sort_records(&mut report.records);
        report.stats.records = report.records.len();
        report.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Scan complete: {} records, {} skipped, {} warnings in {:?}",
            report.stats.records,
            report.stats.skipped,
            report.warnings.len(),
            report.stats.elapsed
        );

        Ok(report)
    }

    fn extract_parallel(&self, root: &Path, paths: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| ImportError::WorkerPool(e.to_string()))?;

        tracing::debug!("Extracting on {} workers", self.workers);

        // collect() on an indexed parallel iterator keeps input order
        Ok(pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.extract_file(root, path))
                .collect()
        }))
    }

    /// Read, decode, normalize and fingerprint one file.
    fn extract_file(&self, root: &Path, path: &Path) -> FileOutcome {
        let rel = match relative_path(root, path) {
            Ok(rel) => rel,
            Err(e) => return skipped(path.display().to_string(), e.to_string()),
        };

        let format = match AudioFormat::from_path(path) {
            Some(format) => format,
            None => return skipped(rel, "unsupported extension".to_string()),
        };

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => return skipped(rel, format!("read failed: {}", e)),
        };

        let mut warnings = Vec::new();
        let raw = match format.decode(&data) {
            Ok(raw) => raw,
            Err(e) if e.is_fatal() => {
                tracing::warn!("Skipping {}: {}", rel, e);
                return skipped(rel, e.to_string());
            }
            Err(e) => {
                warnings.push(warning(&rel, e.to_string(), false));
                musiclib_tags::RawTags::new()
            }
        };

        for message in &raw.warnings {
            tracing::debug!("{}: {}", rel, message);
            warnings.push(warning(&rel, message.clone(), false));
        }

        let fingerprint = match self.strategy.fingerprint(path, &data) {
            Ok(fp) => fp,
            Err(e) => return skipped(rel, format!("fingerprint failed: {}", e)),
        };

        let mut record = self.normalizer.normalize(&raw);
        record.set(CanonicalKey::BasePath, base_path(&rel));
        record.set(CanonicalKey::Mime, format.mime());
        record.set(CanonicalKey::Extension, format.extension());
        record.set(CanonicalKey::EncodedExtension, format.encoded_extension());
        record.set(CanonicalKey::IsEncoded, format.is_encoded().to_string());
        record.set(CanonicalKey::Flags, DEFAULT_FLAGS);
        record.set(CanonicalKey::Fingerprint, fingerprint);
        record.set(CanonicalKey::RelativePath, rel.as_str());

        let missing = self.normalizer.check_required(&mut record);
        let incomplete = !missing.is_empty();
        if incomplete {
            let names: Vec<_> = missing.iter().map(|k| k.as_str()).collect();
            tracing::warn!("{} is missing {}", rel, names.join(", "));
            warnings.push(warning(&rel, format!("missing {}", names.join(", ")), false));
        }

        FileOutcome {
            record: Some(record),
            incomplete,
            warnings,
        }
    }
}

fn warning(relative_path: &str, message: String, fatal: bool) -> ScanWarning {
    ScanWarning {
        relative_path: relative_path.to_string(),
        message,
        fatal,
    }
}

fn skipped(relative_path: String, message: String) -> FileOutcome {
    FileOutcome {
        record: None,
        incomplete: false,
        warnings: vec![ScanWarning {
            relative_path,
            message,
            fatal: true,
        }],
    }
}
