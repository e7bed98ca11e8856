//! DrugBank Core Library
//!
//! Load-once, read-only index over the DrugBank XML database, used by the
//! drug checker for autocomplete, listing, detail pages and interaction checks.
//!
//! # Architecture
//!
//! ```text
//!   candidate paths ──▶ first existing file
//!                              │
//!                       quick-xml parse (once)
//!                              │
//!               ┌──────────────▼──────────────┐
//!               │          Snapshot           │
//!               │  SourceDocument (records)   │
//!               │  DrugSummary cache          │
//!               └──────┬───────────────┬──────┘
//!                      │               │
//!         search / details /      filter_cached /
//!         check_interactions      all_summaries
//! ```
//!
//! # Modules
//!
//! - [`config`]: Candidate locations of the XML document
//! - [`source`]: Document loading and XML parsing
//! - [`models`]: Domain types (DrugRecord, DrugSummary, InteractionRecord, etc.)
//! - [`index`]: The load-once index and its queries
//! - [`lookup`]: Search-box rules (minimum query length, suggestion caps)

pub mod config;
pub mod index;
pub mod lookup;
pub mod models;
pub mod source;

// Re-export commonly used types
pub use config::IndexConfig;
pub use index::{shared_index, DrugIndex, IndexStats, LoadState, QueryError, QueryResult};
pub use models::{
    DrugDetail, DrugRecord, DrugSummary, FilterPage, InteractionRecord, InteractionReport,
    SearchHit, Severity,
};
pub use source::{DocumentSource, SourceDocument, SourceError, XmlFileSource, XmlTextSource};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::PathBuf;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DrugIndexError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<QueryError> for DrugIndexError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Unavailable(source) => DrugIndexError::Unavailable(source.to_string()),
            QueryError::DrugNotFound(id) => DrugIndexError::NotFound(id),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an index over the first existing file among `candidate_paths`.
///
/// Nothing is read until the first query.
#[uniffi::export]
pub fn open_drug_index(candidate_paths: Vec<String>) -> Arc<DrugIndexHandle> {
    let config = IndexConfig::new(candidate_paths.into_iter().map(PathBuf::from).collect());
    Arc::new(DrugIndexHandle {
        index: Arc::new(DrugIndex::from_config(config)),
    })
}

/// Open the process-wide index configured from the environment.
#[uniffi::export]
pub fn open_default_drug_index() -> Arc<DrugIndexHandle> {
    Arc::new(DrugIndexHandle {
        index: shared_index(),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe index wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DrugIndexHandle {
    index: Arc<DrugIndex>,
}

#[uniffi::export]
impl DrugIndexHandle {
    /// Autocomplete by drug name (up to 20 hits).
    pub fn search(&self, query: String) -> Result<Vec<FfiSearchHit>, DrugIndexError> {
        let hits = self.index.search(&query)?;
        Ok(hits.into_iter().map(|h| h.into()).collect())
    }

    /// Search-box suggestions; empty for queries under two characters.
    pub fn autocomplete(&self, query: String) -> Result<Vec<FfiSuggestion>, DrugIndexError> {
        let suggestions = lookup::autocomplete(&self.index, &query)?;
        Ok(suggestions.into_iter().map(|s| s.into()).collect())
    }

    /// Filter cached summaries by name, identifier or synonym (up to 100).
    pub fn filter(&self, query: String) -> Result<FfiFilterPage, DrugIndexError> {
        let page = lookup::browse(&self.index, &query)?;
        Ok(page.into())
    }

    /// Full details for a DrugBank ID.
    pub fn details(&self, drugbank_id: String) -> Result<FfiDrugDetail, DrugIndexError> {
        let detail = self.index.details(&drugbank_id)?;
        Ok(detail.into())
    }

    /// Interactions between two DrugBank IDs; `None` if either ID is blank.
    pub fn check_interactions(
        &self,
        drugbank_id_1: String,
        drugbank_id_2: String,
    ) -> Result<Option<FfiInteractionReport>, DrugIndexError> {
        let report = lookup::interactions(&self.index, &drugbank_id_1, &drugbank_id_2)?;
        Ok(report.map(|r| r.into()))
    }

    /// Load statistics; loads the database if needed.
    pub fn stats(&self) -> Result<FfiIndexStats, DrugIndexError> {
        let stats = self.index.load()?;
        Ok(stats.clone().into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe drug summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugSummary {
    pub name: String,
    pub drugbank_id: String,
    pub drug_type: String,
    pub synonyms: Vec<String>,
    pub description: String,
    pub indication: String,
    pub categories: Vec<String>,
}

impl From<DrugSummary> for FfiDrugSummary {
    fn from(summary: DrugSummary) -> Self {
        Self {
            name: summary.name,
            drugbank_id: summary.identifier,
            drug_type: summary.kind,
            synonyms: summary.synonyms,
            description: summary.description,
            indication: summary.indication,
            categories: summary.categories,
        }
    }
}

/// FFI-safe autocomplete hit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSearchHit {
    pub name: String,
    pub drugbank_id: String,
    pub prescribable_name: String,
    pub synonyms: Vec<String>,
    pub drug_type: String,
}

impl From<SearchHit> for FfiSearchHit {
    fn from(hit: SearchHit) -> Self {
        Self {
            name: hit.name,
            drugbank_id: hit.identifier,
            prescribable_name: hit.display_name,
            synonyms: hit.synonyms,
            drug_type: hit.kind,
        }
    }
}

/// FFI-safe suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSuggestion {
    pub name: String,
    pub drugbank_id: String,
    pub drug_type: String,
}

impl From<lookup::Suggestion> for FfiSuggestion {
    fn from(suggestion: lookup::Suggestion) -> Self {
        Self {
            name: suggestion.name,
            drugbank_id: suggestion.identifier,
            drug_type: suggestion.kind,
        }
    }
}

/// FFI-safe filter page.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFilterPage {
    pub results: Vec<FfiDrugSummary>,
    pub total: u32,
    pub total_in_db: u32,
}

impl From<FilterPage> for FfiFilterPage {
    fn from(page: FilterPage) -> Self {
        Self {
            results: page.results.into_iter().map(|s| s.into()).collect(),
            total: page.total as u32,
            total_in_db: page.total_in_index as u32,
        }
    }
}

/// FFI-safe drug detail.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugDetail {
    pub drugbank_id: String,
    pub name: String,
    pub description: String,
    pub indication: String,
    pub cas_number: String,
    pub categories: Vec<String>,
}

impl From<DrugDetail> for FfiDrugDetail {
    fn from(detail: DrugDetail) -> Self {
        Self {
            drugbank_id: detail.identifier,
            name: detail.name,
            description: detail.description,
            indication: detail.indication,
            cas_number: detail.registry_number,
            categories: detail.categories.into_iter().map(|c| c.name).collect(),
        }
    }
}

/// FFI-safe severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSeverity {
    Minor,
    Moderate,
    Major,
}

impl From<Severity> for FfiSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Minor => FfiSeverity::Minor,
            Severity::Moderate => FfiSeverity::Moderate,
            Severity::Major => FfiSeverity::Major,
        }
    }
}

/// FFI-safe interaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteraction {
    pub drug1: String,
    pub drug2: String,
    pub description: String,
    pub severity: FfiSeverity,
}

impl From<InteractionRecord> for FfiInteraction {
    fn from(record: InteractionRecord) -> Self {
        Self {
            drug1: record.subject_name,
            drug2: record.partner_name,
            description: record.description,
            severity: record.severity.into(),
        }
    }
}

/// FFI-safe interaction report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteractionReport {
    pub interactions: Vec<FfiInteraction>,
    pub total: u32,
}

impl From<InteractionReport> for FfiInteractionReport {
    fn from(report: InteractionReport) -> Self {
        Self {
            interactions: report.interactions.into_iter().map(|i| i.into()).collect(),
            total: report.total as u32,
        }
    }
}

/// FFI-safe load statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIndexStats {
    pub origin: String,
    pub record_count: u32,
    pub cached_count: u32,
    pub parse_ms: u64,
    pub cache_ms: u64,
    pub loaded_at: String,
}

impl From<IndexStats> for FfiIndexStats {
    fn from(stats: IndexStats) -> Self {
        Self {
            origin: stats.origin,
            record_count: stats.record_count as u32,
            cached_count: stats.cached_count as u32,
            parse_ms: stats.parse_ms,
            cache_ms: stats.cache_ms,
            loaded_at: stats.loaded_at,
        }
    }
}
