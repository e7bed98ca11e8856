//! Raw drug records as read from the source document.

use serde::{Deserialize, Serialize};

/// Drug type used when a record carries no `type` attribute.
pub const DEFAULT_DRUG_KIND: &str = "small molecule";

/// Identifier reported for records without a primary DrugBank ID.
pub const UNKNOWN_IDENTIFIER: &str = "N/A";

/// A single `<drug>` record, uninterpreted.
///
/// Text fields hold the element text exactly as written; a missing element
/// and an empty element both read as an empty string, except for `name`,
/// where the difference matters to autocomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    /// Text of the `<drugbank-id primary="true">` element
    pub primary_id: Option<String>,
    /// Text of the `<name>` element; `None` if the element is missing
    pub name: Option<String>,
    /// The `type` attribute (e.g. "small molecule", "biotech")
    pub kind: Option<String>,
    /// Non-empty `<synonym>` texts, in document order
    pub synonyms: Vec<String>,
    pub description: String,
    pub indication: String,
    /// CAS registry number
    pub cas_number: String,
    /// Non-empty category names, in document order
    pub categories: Vec<String>,
    /// Entries of `<drug-interactions>`
    pub interactions: Vec<InteractionEntry>,
}

/// One `<drug-interaction>` entry inside a drug record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InteractionEntry {
    /// DrugBank ID of the interacting drug
    pub partner_id: Option<String>,
    /// Name of the interacting drug
    pub partner_name: String,
    pub description: String,
}

impl DrugRecord {
    /// Create a record with an identifier and a name.
    pub fn new(primary_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            primary_id: Some(primary_id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Name text, empty when the element is missing.
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Primary identifier, or the `N/A` sentinel.
    pub fn identifier(&self) -> &str {
        self.primary_id.as_deref().unwrap_or(UNKNOWN_IDENTIFIER)
    }

    /// Drug type, defaulting to small molecule.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_DRUG_KIND)
    }

    /// Whether this record's primary identifier is exactly `id`.
    pub fn has_identifier(&self, id: &str) -> bool {
        self.primary_id.as_deref() == Some(id)
    }

    /// Interaction entries that reference `partner_id`.
    pub fn interactions_with<'a>(
        &'a self,
        partner_id: &'a str,
    ) -> impl Iterator<Item = &'a InteractionEntry> + 'a {
        self.interactions
            .iter()
            .filter(move |entry| entry.partner_id.as_deref() == Some(partner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = DrugRecord::default();
        assert_eq!(record.identifier(), "N/A");
        assert_eq!(record.kind(), "small molecule");
        assert_eq!(record.name_text(), "");
    }

    #[test]
    fn test_has_identifier_is_exact() {
        let record = DrugRecord::new("DB00945", "Aspirin");
        assert!(record.has_identifier("DB00945"));
        assert!(!record.has_identifier("db00945"));
        assert!(!record.has_identifier("DB0094"));
    }

    #[test]
    fn test_interactions_with_filters_by_partner() {
        let mut record = DrugRecord::new("DB00945", "Aspirin");
        record.interactions = vec![
            InteractionEntry {
                partner_id: Some("DB00682".into()),
                partner_name: "Warfarin".into(),
                description: "Bleeding risk".into(),
            },
            InteractionEntry {
                partner_id: Some("DB00001".into()),
                partner_name: "Lepirudin".into(),
                description: "Other".into(),
            },
            InteractionEntry {
                partner_id: None,
                partner_name: "Unknown".into(),
                description: "No id".into(),
            },
        ];

        let matches: Vec<_> = record.interactions_with("DB00682").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].partner_name, "Warfarin");
    }
}
