//! In-memory DrugBank index.
//!
//! The backing document is parsed at most once per index, on first use, and
//! then shared read-only by every query:
//!
//! ```text
//!   Unloaded ──first query──▶ Loading ──ok──▶ Loaded
//!       ▲                        │
//!       └────────error───────────┘   (next query retries)
//! ```
//!
//! Readers of a loaded index take no lock; only the transition out of
//! `Unloaded` is serialized.

mod queries;

pub use queries::*;

use std::sync::{Arc, Mutex, OnceLock, PoisonError, TryLockError};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::models::DrugSummary;
use crate::source::{DocumentSource, SourceDocument, SourceError, XmlFileSource};

/// Query errors.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The backing document could not be loaded.
    #[error(transparent)]
    Unavailable(#[from] SourceError),

    #[error("Drug {0} not found")]
    DrugNotFound(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Load lifecycle of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Figures recorded when the index finished loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexStats {
    /// Where the document was read from
    pub origin: String,
    /// Drug records in the document
    pub record_count: usize,
    /// Records with a usable name, i.e. summaries in the cache
    pub cached_count: usize,
    pub parse_ms: u64,
    pub cache_ms: u64,
    /// RFC 3339 timestamp
    pub loaded_at: String,
}

/// Everything a loaded index holds. Never mutated after publication.
struct Snapshot {
    document: SourceDocument,
    summaries: Vec<DrugSummary>,
    stats: IndexStats,
}

/// Read-only index over the DrugBank database.
pub struct DrugIndex {
    source: Box<dyn DocumentSource>,
    snapshot: OnceLock<Snapshot>,
    load_lock: Mutex<()>,
}

impl DrugIndex {
    /// Create an index that loads lazily from `source`.
    pub fn new(source: impl DocumentSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            snapshot: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Create an index over the first existing candidate file.
    pub fn from_config(config: IndexConfig) -> Self {
        Self::new(XmlFileSource::new(config))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        if self.snapshot.get().is_some() {
            return LoadState::Loaded;
        }
        match self.load_lock.try_lock() {
            Err(TryLockError::WouldBlock) => LoadState::Loading,
            _ if self.snapshot.get().is_some() => LoadState::Loaded,
            _ => LoadState::Unloaded,
        }
    }

    /// Load now instead of on the first query.
    pub fn load(&self) -> QueryResult<&IndexStats> {
        Ok(&self.ensure_loaded()?.stats)
    }

    /// Load statistics, if the index has been loaded.
    pub fn stats(&self) -> Option<&IndexStats> {
        self.snapshot.get().map(|s| &s.stats)
    }

    /// Every cached summary, in document order.
    pub fn all_summaries(&self) -> QueryResult<&[DrugSummary]> {
        Ok(&self.ensure_loaded()?.summaries)
    }

    fn ensure_loaded(&self) -> Result<&Snapshot, SourceError> {
        if let Some(snapshot) = self.snapshot.get() {
            return Ok(snapshot);
        }

        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished while we waited
        if let Some(snapshot) = self.snapshot.get() {
            return Ok(snapshot);
        }

        let snapshot = self.build_snapshot().map_err(|e| {
            warn!("Failed to load DrugBank database: {}", e);
            e
        })?;

        Ok(self.snapshot.get_or_init(|| snapshot))
    }

    fn build_snapshot(&self) -> Result<Snapshot, SourceError> {
        let started = Instant::now();
        let document = self.source.load()?;
        let parse_elapsed = started.elapsed();

        let cache_started = Instant::now();
        let summaries = build_summaries(&document);
        let cache_elapsed = cache_started.elapsed();

        let stats = IndexStats {
            origin: document.origin().to_string(),
            record_count: document.len(),
            cached_count: summaries.len(),
            parse_ms: parse_elapsed.as_millis() as u64,
            cache_ms: cache_elapsed.as_millis() as u64,
            loaded_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            origin = %stats.origin,
            records = stats.record_count,
            cached = stats.cached_count,
            parse_ms = stats.parse_ms,
            cache_ms = stats.cache_ms,
            "DrugBank database loaded"
        );

        Ok(Snapshot {
            document,
            summaries,
            stats,
        })
    }
}

/// One pass over the document; nameless records are left out.
fn build_summaries(document: &SourceDocument) -> Vec<DrugSummary> {
    document
        .records()
        .iter()
        .filter_map(|record| {
            let summary = DrugSummary::from_record(record);
            if summary.is_none() {
                debug!("Skipping record {} without a name", record.identifier());
            }
            summary
        })
        .collect()
}

static SHARED_INDEX: OnceLock<Arc<DrugIndex>> = OnceLock::new();

/// Process-wide index configured from the environment.
///
/// The handle is created on first call; the document still loads lazily.
pub fn shared_index() -> Arc<DrugIndex> {
    SHARED_INDEX
        .get_or_init(|| Arc::new(DrugIndex::from_config(IndexConfig::from_env())))
        .clone()
}
