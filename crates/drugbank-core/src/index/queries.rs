//! Query operations over a loaded index.
//!
//! Autocomplete, detail and interaction lookups scan the raw document; the
//! listing filter scans the summary cache. Autocomplete and listing keep
//! separate corpora and caps.

use tracing::debug;

use super::{DrugIndex, QueryError, QueryResult};
use crate::models::{
    DrugDetail, DrugRecord, DrugSummary, FilterPage, InteractionRecord, InteractionReport,
    SearchHit,
};

/// Maximum autocomplete hits.
pub const SEARCH_LIMIT: usize = 20;

/// Maximum summaries per filter page.
pub const FILTER_LIMIT: usize = 100;

impl DrugIndex {
    /// Autocomplete: case-insensitive substring match on the drug name only.
    ///
    /// Hits come back in document order, first 20 only. Minimum query
    /// length is left to the caller (see [`crate::lookup`]).
    pub fn search(&self, query: &str) -> QueryResult<Vec<SearchHit>> {
        let snapshot = self.ensure_loaded()?;
        let query_lower = query.to_lowercase();

        let hits: Vec<SearchHit> = snapshot
            .document
            .records()
            .iter()
            .filter(|record| {
                record
                    .name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&query_lower))
            })
            .take(SEARCH_LIMIT)
            .map(SearchHit::from_record)
            .collect();

        Ok(hits)
    }

    /// Listing filter over cached summaries: name, identifier or synonyms.
    pub fn filter_cached(&self, query: &str) -> QueryResult<FilterPage> {
        let snapshot = self.ensure_loaded()?;
        let query_lower = query.to_lowercase();

        let results: Vec<DrugSummary> = snapshot
            .summaries
            .iter()
            .filter(|summary| summary.matches(&query_lower))
            .take(FILTER_LIMIT)
            .cloned()
            .collect();

        Ok(FilterPage {
            total: results.len(),
            results,
            total_in_index: snapshot.summaries.len(),
        })
    }

    /// Full detail for the drug whose primary identifier is exactly `identifier`.
    pub fn details(&self, identifier: &str) -> QueryResult<DrugDetail> {
        let snapshot = self.ensure_loaded()?;

        snapshot
            .document
            .find_by_id(identifier)
            .map(|record| DrugDetail::from_record(identifier, record))
            .ok_or_else(|| {
                debug!("No drug with identifier {}", identifier);
                QueryError::DrugNotFound(identifier.to_string())
            })
    }

    /// Interactions between two drugs, looked up from both sides.
    ///
    /// Fails only when `id_a` is unknown. Entries listed by `id_b` are added
    /// unless an entry with the same description is already present.
    pub fn check_interactions(&self, id_a: &str, id_b: &str) -> QueryResult<InteractionReport> {
        let snapshot = self.ensure_loaded()?;
        let document = &snapshot.document;

        let drug_a = document
            .find_by_id(id_a)
            .ok_or_else(|| QueryError::DrugNotFound(id_a.to_string()))?;

        let mut interactions: Vec<InteractionRecord> = drug_a
            .interactions_with(id_b)
            .map(|entry| {
                InteractionRecord::new(
                    drug_a.name_text().to_string(),
                    entry.partner_name.clone(),
                    entry.description.clone(),
                )
            })
            .collect();

        if let Some(drug_b) = document.find_by_id(id_b) {
            append_reverse(&mut interactions, drug_b, drug_a, id_a);
        }

        Ok(InteractionReport::new(interactions))
    }
}

/// Add `drug_b`'s entries for `id_a`, skipping descriptions already reported.
fn append_reverse(
    interactions: &mut Vec<InteractionRecord>,
    drug_b: &DrugRecord,
    drug_a: &DrugRecord,
    id_a: &str,
) {
    for entry in drug_b.interactions_with(id_a) {
        if interactions
            .iter()
            .any(|existing| existing.description == entry.description)
        {
            continue;
        }
        interactions.push(InteractionRecord::new(
            drug_b.name_text().to_string(),
            drug_a.name_text().to_string(),
            entry.description.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::source::XmlTextSource;

    fn drug(id: &str, name: &str, interactions: &[(&str, &str, &str)]) -> String {
        let entries: String = interactions
            .iter()
            .map(|(pid, pname, desc)| {
                format!(
                    "<drug-interaction><drugbank-id>{}</drugbank-id><name>{}</name><description>{}</description></drug-interaction>",
                    pid, pname, desc
                )
            })
            .collect();
        format!(
            "<drug><drugbank-id primary=\"true\">{}</drugbank-id><name>{}</name><drug-interactions>{}</drug-interactions></drug>",
            id, name, entries
        )
    }

    fn index_of(drugs: &[String]) -> DrugIndex {
        let xml = format!(
            "<drugbank xmlns=\"http://www.drugbank.ca\">{}</drugbank>",
            drugs.concat()
        );
        DrugIndex::new(XmlTextSource::new("test", xml))
    }

    #[test]
    fn test_search_matches_name_only() {
        let mut with_synonym = drug("DB00003", "Other", &[]);
        with_synonym = with_synonym.replace(
            "<drug-interactions>",
            "<synonyms><synonym>Aspirinate</synonym></synonyms><drug-interactions>",
        );
        let index = index_of(&[drug("DB00001", "Aspirin", &[]), with_synonym]);

        let hits = index.search("ASPIRIN").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identifier, "DB00001");
        assert_eq!(hits[0].display_name, "Aspirin");
    }

    #[test]
    fn test_search_caps_at_twenty() {
        let drugs: Vec<String> = (0..30)
            .map(|i| drug(&format!("DB{:05}", i), &format!("Drug {}", i), &[]))
            .collect();
        let index = index_of(&drugs);

        let hits = index.search("drug").unwrap();
        assert_eq!(hits.len(), SEARCH_LIMIT);
        assert_eq!(hits[19].name, "Drug 19");
    }

    #[test]
    fn test_filter_matches_identifier() {
        let index = index_of(&[drug("DB00001", "Lepirudin", &[]), drug("DB00002", "Cetuximab", &[])]);

        let page = index.filter_cached("db00002").unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.total_in_index, 2);
        assert_eq!(page.results[0].name, "Cetuximab");
    }

    #[test]
    fn test_details_exact_match_only() {
        let index = index_of(&[drug("DB00001", "Lepirudin", &[])]);

        assert_eq!(index.details("DB00001").unwrap().name, "Lepirudin");
        assert!(matches!(
            index.details("db00001"),
            Err(QueryError::DrugNotFound(_))
        ));
        assert!(matches!(
            index.details("DB0000"),
            Err(QueryError::DrugNotFound(_))
        ));
    }

    #[test]
    fn test_interactions_both_directions() {
        let index = index_of(&[
            drug("DB00001", "Lepirudin", &[("DB00002", "Warfarin", "Severe bleeding")]),
            drug("DB00002", "Warfarin", &[("DB00001", "Lepirudin", "Use caution")]),
        ]);

        let report = index.check_interactions("DB00001", "DB00002").unwrap();
        assert_eq!(report.total, 2);

        let forward = &report.interactions[0];
        assert_eq!(forward.subject_name, "Lepirudin");
        assert_eq!(forward.partner_name, "Warfarin");
        assert_eq!(forward.severity, Severity::Major);

        let reverse = &report.interactions[1];
        assert_eq!(reverse.subject_name, "Warfarin");
        assert_eq!(reverse.partner_name, "Lepirudin");
        assert_eq!(reverse.severity, Severity::Moderate);
    }

    #[test]
    fn test_reverse_only_interaction() {
        let index = index_of(&[
            drug("DB00001", "Lepirudin", &[]),
            drug("DB00002", "Warfarin", &[("DB00001", "Lepirudin", "Increased effect")]),
        ]);

        let report = index.check_interactions("DB00001", "DB00002").unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.interactions[0].subject_name, "Warfarin");
        assert_eq!(report.interactions[0].severity, Severity::Minor);
    }

    #[test]
    fn test_missing_b_still_reports_a_side() {
        let index = index_of(&[drug(
            "DB00001",
            "Lepirudin",
            &[("DB09999", "Unlisted", "Moderate interaction")],
        )]);

        let report = index.check_interactions("DB00001", "DB09999").unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.interactions[0].partner_name, "Unlisted");
    }
}
