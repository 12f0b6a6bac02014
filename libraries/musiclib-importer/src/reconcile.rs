//! Disk ⇄ persisted catalog reconciliation
//!
//! Both sides are grouped by fingerprint. A fingerprint only on disk is
//! *added*, one only in the store is *deleted*, and one on both sides whose
//! relative path changed is *moved* (the persisted song keeps its id).
//! Identical files at several paths are matched copy by copy.

use crate::{hierarchy::build_catalog, hierarchy::flatten_catalog, Result};
use musiclib_core::{sort_records, CatalogStore, PruneReport, TagRecord};
use musiclib_tags::format_duration;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A song found on both sides under different relative paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedSong {
    /// Persisted record, carrying the song id
    pub from: TagRecord,
    /// Freshly scanned record at the new location
    pub to: TagRecord,
}

/// Classified differences between disk and the persisted catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub added: Vec<TagRecord>,
    pub deleted: Vec<TagRecord>,
    pub moved: Vec<MovedSong>,
    pub unchanged: usize,
}

impl ReconcilePlan {
    /// Diff `disk` against `persisted`.
    ///
    /// Records sharing a fingerprint are matched as a group: copies at the same
    /// relative path on both sides are unchanged, the remaining copies pair up
    /// as moves in path order, and any surplus is added or deleted.
    pub fn new(disk: &[TagRecord], persisted: &[TagRecord]) -> Self {
        let disk_map = by_fingerprint(disk);
        let persisted_map = by_fingerprint(persisted);

        let mut plan = Self::default();

        for (fingerprint, on_disk) in &disk_map {
            let stored = persisted_map.get(fingerprint).map_or(&[][..], Vec::as_slice);
            plan.match_group(on_disk, stored);
        }

        for (fingerprint, stored) in &persisted_map {
            if !disk_map.contains_key(fingerprint) {
                plan.deleted.extend(stored.iter().map(|r| (*r).clone()));
            }
        }

        sort_records(&mut plan.added);
        sort_records(&mut plan.deleted);
        plan.moved.sort_by(|a, b| a.to.relative_path().cmp(b.to.relative_path()));

        plan
    }

    fn match_group(&mut self, on_disk: &[&TagRecord], stored: &[&TagRecord]) {
        let mut new_paths: Vec<&TagRecord> = Vec::new();
        for &record in on_disk {
            if has_path(stored, record.relative_path()) {
                self.unchanged += 1;
            } else {
                new_paths.push(record);
            }
        }
        let old_paths: Vec<&TagRecord> = stored
            .iter()
            .copied()
            .filter(|record| !has_path(on_disk, record.relative_path()))
            .collect();

        let pairs = new_paths.len().min(old_paths.len());
        for (from, to) in old_paths.iter().zip(&new_paths) {
            self.moved.push(MovedSong {
                from: (*from).clone(),
                to: (*to).clone(),
            });
        }
        self.added
            .extend(new_paths[pairs..].iter().map(|r| (*r).clone()));
        self.deleted
            .extend(old_paths[pairs..].iter().map(|r| (*r).clone()));
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.moved.is_empty()
    }
}

fn has_path(records: &[&TagRecord], relative_path: &str) -> bool {
    records.iter().any(|r| r.relative_path() == relative_path)
}

/// Group records by fingerprint, each group in relative path order.
fn by_fingerprint(records: &[TagRecord]) -> HashMap<&str, Vec<&TagRecord>> {
    let mut sorted: Vec<&TagRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));

    let mut groups: HashMap<&str, Vec<&TagRecord>> = HashMap::new();
    for record in sorted {
        groups.entry(record.fingerprint()).or_default().push(record);
    }
    groups
}

/// Counts from one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub added: usize,
    pub deleted: usize,
    pub moved: usize,
    pub unchanged: usize,
    pub pruned: PruneReport,
    pub elapsed: Duration,
}

impl fmt::Display for RefreshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} deleted, {} moved, {} unchanged ({} albums, {} artists pruned) in {}",
            self.added,
            self.deleted,
            self.moved,
            self.unchanged,
            self.pruned.albums,
            self.pruned.artists,
            format_duration(self.elapsed.as_secs_f64())
        )
    }
}

/// Applies disk scans to a [`CatalogStore`]
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn CatalogStore>,
    /// Replace metadata of moved songs instead of only their paths
    reextract_moved: bool,
}

impl Reconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            reextract_moved: false,
        }
    }

    /// Set whether moved songs take the freshly scanned metadata (default: false)
    pub fn reextract_moved(mut self, reextract: bool) -> Self {
        self.reextract_moved = reextract;
        self
    }

    /// Replace the whole persisted catalog with `disk`.
    pub async fn rebuild(&self, disk: &[TagRecord]) -> Result<RefreshStats> {
        let start_time = Instant::now();
        let mut catalog = build_catalog(disk);

        self.store.clear().await?;
        self.store.insert_catalog(&mut catalog).await?;

        let stats = RefreshStats {
            added: catalog.song_count(),
            elapsed: start_time.elapsed(),
            ..Default::default()
        };
        tracing::info!(
            "Created catalog: {} artists, {} albums, {} songs in {}",
            catalog.artists.len(),
            catalog.album_count(),
            stats.added,
            format_duration(stats.elapsed.as_secs_f64())
        );
        Ok(stats)
    }

    /// Load the persisted catalog, diff it against `disk` and apply the result.
    pub async fn refresh(&self, disk: &[TagRecord]) -> Result<RefreshStats> {
        let start_time = Instant::now();
        let persisted = flatten_catalog(&self.store.load_catalog().await?);
        let plan = ReconcilePlan::new(disk, &persisted);

        tracing::debug!(
            "Plan: {} added, {} deleted, {} moved",
            plan.added.len(),
            plan.deleted.len(),
            plan.moved.len()
        );

        let mut stats = self.apply(&plan).await?;
        stats.elapsed = start_time.elapsed();

        tracing::info!("Refresh complete: {}", stats);
        Ok(stats)
    }

    /// Apply a computed plan: deletions, additions, moves, then pruning.
    ///
    /// A store failure aborts the pass; changes already applied stay applied.
    pub async fn apply(&self, plan: &ReconcilePlan) -> Result<RefreshStats> {
        let start_time = Instant::now();

        for record in &plan.deleted {
            let Some(id) = record.id else {
                tracing::warn!("Persisted record {} has no id", record.relative_path());
                continue;
            };
            tracing::debug!("Deleting {}", record.relative_path());
            self.store.delete_song(id).await?;
        }

        for record in &plan.added {
            let id = self.store.add_song(record).await?;
            tracing::debug!("Added {} as {}", record.relative_path(), id);
        }

        for moved in &plan.moved {
            let Some(id) = moved.from.id else {
                tracing::warn!("Persisted record {} has no id", moved.from.relative_path());
                continue;
            };
            tracing::debug!(
                "Moved {} -> {}",
                moved.from.relative_path(),
                moved.to.relative_path()
            );
            if self.reextract_moved {
                self.store.update_song_metadata(id, &moved.to).await?;
            } else {
                self.store
                    .update_song_paths(
                        id,
                        moved.to.relative_path(),
                        moved.to.get(musiclib_core::CanonicalKey::BasePath),
                    )
                    .await?;
            }
        }

        let pruned = self.store.prune_empty_containers().await?;

        Ok(RefreshStats {
            added: plan.added.len(),
            deleted: plan.deleted.len(),
            moved: plan.moved.len(),
            unchanged: plan.unchanged,
            pruned,
            elapsed: start_time.elapsed(),
        })
    }
}
