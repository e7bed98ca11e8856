//! Drug-drug interaction results.

use serde::{Deserialize, Serialize};

/// Keywords that mark an interaction as major.
const MAJOR_KEYWORDS: [&str; 3] = ["severe", "serious", "major"];

/// Keywords that mark an interaction as moderate.
const MODERATE_KEYWORDS: [&str; 2] = ["moderate", "caution"];

/// Severity tier derived from the interaction description.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl Severity {
    /// Classify free text. Major keywords are checked before moderate ones.
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();
        if MAJOR_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Severity::Major
        } else if MODERATE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interaction between two drugs, as seen from `subject_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    pub subject_name: String,
    pub partner_name: String,
    pub description: String,
    pub severity: Severity,
}

impl InteractionRecord {
    pub fn new(subject_name: String, partner_name: String, description: String) -> Self {
        let severity = Severity::classify(&description);
        Self {
            subject_name,
            partner_name,
            description,
            severity,
        }
    }
}

/// Result of an interaction check between two drugs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    pub interactions: Vec<InteractionRecord>,
    pub total: usize,
}

impl InteractionReport {
    pub fn new(interactions: Vec<InteractionRecord>) -> Self {
        let total = interactions.len();
        Self {
            interactions,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Highest severity in the report, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.interactions.iter().map(|i| i.severity).max()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
