//! Backing document: where it lives and how it is read.

mod parser;

pub use parser::*;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::IndexConfig;
use crate::models::DrugRecord;

/// Errors raised while loading the backing document.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("DrugBank XML file not found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("malformed document: {0}")]
    Malformed(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The parsed document: every top-level drug record, in document order.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    origin: String,
    records: Vec<DrugRecord>,
}

impl SourceDocument {
    pub fn new(origin: impl Into<String>, records: Vec<DrugRecord>) -> Self {
        Self {
            origin: origin.into(),
            records,
        }
    }

    /// Where the document was read from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose primary identifier is exactly `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&DrugRecord> {
        self.records.iter().find(|r| r.has_identifier(id))
    }
}

/// Something that can produce the source document on demand.
///
/// The index calls [`DocumentSource::load`] at most once per successful load.
pub trait DocumentSource: Send + Sync {
    fn load(&self) -> SourceResult<SourceDocument>;
}

/// Reads the first existing file among the configured candidates.
#[derive(Debug, Clone)]
pub struct XmlFileSource {
    config: IndexConfig,
}

impl XmlFileSource {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }
}

impl DocumentSource for XmlFileSource {
    fn load(&self) -> SourceResult<SourceDocument> {
        let path = self.config.locate().ok_or_else(|| SourceError::NotFound {
            searched: self.config.candidates().to_vec(),
        })?;

        tracing::info!("Loading DrugBank database from {}", path.display());

        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = parse_records(BufReader::new(file))?;

        Ok(SourceDocument::new(path.display().to_string(), records))
    }
}

/// An in-memory XML document.
#[derive(Debug, Clone)]
pub struct XmlTextSource {
    origin: String,
    xml: String,
}

impl XmlTextSource {
    pub fn new(origin: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            xml: xml.into(),
        }
    }
}

impl DocumentSource for XmlTextSource {
    fn load(&self) -> SourceResult<SourceDocument> {
        let records = parse_records(self.xml.as_bytes())?;
        Ok(SourceDocument::new(self.origin.clone(), records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<drugbank xmlns="http://www.drugbank.ca">
  <drug type="small molecule">
    <drugbank-id primary="true">DB00945</drugbank-id>
    <name>Aspirin</name>
  </drug>
</drugbank>"#;

    #[test]
    fn test_file_source_not_found_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("drugbank.xml");
        let source = XmlFileSource::new(IndexConfig::new(vec![missing.clone()]));

        match source.load() {
            Err(SourceError::NotFound { searched }) => assert_eq!(searched, vec![missing]),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_file_source_reads_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full database.xml");
        std::fs::write(&path, DOC).unwrap();

        let source = XmlFileSource::new(IndexConfig::new(vec![
            dir.path().join("nope.xml"),
            path.clone(),
        ]));
        let document = source.load().unwrap();

        assert_eq!(document.len(), 1);
        assert_eq!(document.origin(), path.display().to_string());
        assert!(document.find_by_id("DB00945").is_some());
    }

    #[test]
    fn test_text_source() {
        let document = XmlTextSource::new("inline", DOC).load().unwrap();
        assert_eq!(document.origin(), "inline");
        assert_eq!(document.records()[0].name.as_deref(), Some("Aspirin"));
    }
}
