//! Derived views over drug records: cached summaries, search hits, details.

use serde::{Deserialize, Serialize};

use super::DrugRecord;

/// Synonyms kept per summary and search hit.
pub const MAX_SYNONYMS: usize = 3;
/// Characters kept of description and indication.
pub const MAX_TEXT_CHARS: usize = 200;
/// Categories kept per summary.
pub const MAX_CATEGORIES: usize = 5;

/// Compact, truncated view of a drug used for listing and filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugSummary {
    pub name: String,
    /// Primary DrugBank ID, or "N/A"
    pub identifier: String,
    /// Drug type (e.g. "small molecule", "biotech")
    pub kind: String,
    /// At most three synonyms
    pub synonyms: Vec<String>,
    /// At most 200 characters
    pub description: String,
    /// At most 200 characters
    pub indication: String,
    /// At most five category names
    pub categories: Vec<String>,
}

impl DrugSummary {
    /// Summarize a record. Records without a usable name yield `None`.
    pub fn from_record(record: &DrugRecord) -> Option<Self> {
        let name = record.name.as_deref().filter(|n| !n.is_empty())?;

        Some(Self {
            name: name.to_string(),
            identifier: record.identifier().to_string(),
            kind: record.kind().to_string(),
            synonyms: record.synonyms.iter().take(MAX_SYNONYMS).cloned().collect(),
            description: truncate_chars(&record.description, MAX_TEXT_CHARS),
            indication: truncate_chars(&record.indication, MAX_TEXT_CHARS),
            categories: record
                .categories
                .iter()
                .take(MAX_CATEGORIES)
                .cloned()
                .collect(),
        })
    }

    /// Case-insensitive substring match on name, identifier, or synonyms.
    ///
    /// `query_lower` must already be lowercased.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.identifier.to_lowercase().contains(query_lower)
            || self
                .synonyms
                .iter()
                .any(|s| s.to_lowercase().contains(query_lower))
    }
}

/// An autocomplete hit from the raw document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub name: String,
    pub identifier: String,
    /// Name shown to prescribers; currently the drug name itself
    pub display_name: String,
    /// At most three synonyms
    pub synonyms: Vec<String>,
    pub kind: String,
}

impl SearchHit {
    pub fn from_record(record: &DrugRecord) -> Self {
        let name = record.name_text().to_string();
        Self {
            display_name: name.clone(),
            name,
            identifier: record.identifier().to_string(),
            synonyms: record.synonyms.iter().take(MAX_SYNONYMS).cloned().collect(),
            kind: record.kind().to_string(),
        }
    }
}

/// A named category in a detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryEntry {
    pub name: String,
}

/// Full, untruncated view of a single drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugDetail {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub indication: String,
    /// CAS registry number, empty when unknown
    pub registry_number: String,
    pub categories: Vec<CategoryEntry>,
}

impl DrugDetail {
    pub fn from_record(identifier: &str, record: &DrugRecord) -> Self {
        Self {
            identifier: identifier.to_string(),
            name: record.name_text().to_string(),
            description: record.description.clone(),
            indication: record.indication.clone(),
            registry_number: record.cas_number.clone(),
            categories: record
                .categories
                .iter()
                .map(|name| CategoryEntry { name: name.clone() })
                .collect(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A page of filtered summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterPage {
    pub results: Vec<DrugSummary>,
    /// Number of results on this page
    pub total: usize,
    /// Number of summaries in the whole index
    pub total_in_index: usize,
}

impl FilterPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            total_in_index: 0,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> DrugRecord {
        let mut record = DrugRecord::new("DB00945", "Acetylsalicylic acid");
        record.synonyms = vec![
            "Aspirin".into(),
            "ASA".into(),
            "2-Acetoxybenzoic acid".into(),
            "Acetylsalicylate".into(),
        ];
        record.description = "x".repeat(250);
        record.indication = "Pain relief".into();
        record.categories = (1..=7).map(|i| format!("Category {}", i)).collect();
        record
    }

    #[test]
    fn test_summary_applies_caps() {
        let summary = DrugSummary::from_record(&full_record()).unwrap();
        assert_eq!(summary.synonyms, vec!["Aspirin", "ASA", "2-Acetoxybenzoic acid"]);
        assert_eq!(summary.description.chars().count(), 200);
        assert_eq!(summary.indication, "Pain relief");
        assert_eq!(summary.categories.len(), 5);
        assert_eq!(summary.categories[4], "Category 5");
        assert_eq!(summary.kind, "small molecule");
    }

    #[test]
    fn test_summary_skips_nameless_records() {
        let mut record = full_record();
        record.name = None;
        assert!(DrugSummary::from_record(&record).is_none());

        record.name = Some(String::new());
        assert!(DrugSummary::from_record(&record).is_none());
    }

    #[test]
    fn test_summary_identifier_sentinel() {
        let mut record = full_record();
        record.primary_id = None;
        let summary = DrugSummary::from_record(&record).unwrap();
        assert_eq!(summary.identifier, "N/A");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(210);
        let truncated = truncate_chars(&text, 200);
        assert_eq!(truncated.chars().count(), 200);
        assert_eq!(truncated.len(), 400);

        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 200), "");
    }

    #[test]
    fn test_summary_matching() {
        let summary = DrugSummary::from_record(&full_record()).unwrap();
        assert!(summary.matches("acetyl"));
        assert!(summary.matches("db009"));
        assert!(summary.matches("asa"));
        // Fourth synonym was dropped by the cap
        assert!(!summary.matches("acetylsalicylate"));
    }

    #[test]
    fn test_detail_keeps_full_categories() {
        let detail = DrugDetail::from_record("DB00945", &full_record());
        assert_eq!(detail.categories.len(), 7);
        assert_eq!(detail.description.len(), 250);
        assert_eq!(detail.registry_number, "");
    }
}
