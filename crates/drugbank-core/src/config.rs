//! Index configuration.
//!
//! Resolved once at startup and handed to [`crate::DrugIndex`]; the index never
//! reads environment variables itself.

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

/// Overrides every other location when set.
pub const XML_PATH_VAR: &str = "DRUGBANK_XML_PATH";
/// Project directory holding `static/` and `data/`.
pub const BASE_DIR_VAR: &str = "DRUGBANK_BASE_DIR";

/// File names the database is published under, preferred first.
const FILE_NAMES: [&str; 2] = ["full database.xml", "drugbank.xml"];

/// Where to look for the DrugBank XML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexConfig {
    candidates: Vec<PathBuf>,
}

impl IndexConfig {
    /// Use an explicit, ordered list of candidate paths.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Standard locations, in lookup order:
    /// `<base>/static`, `<home>/.data/drugbank`, then `<base>/data`.
    pub fn default_for(base_dir: &Path, home_dir: Option<&Path>) -> Self {
        let mut dirs = vec![base_dir.join("static")];
        if let Some(home) = home_dir {
            dirs.push(home.join(".data").join("drugbank"));
        }
        dirs.push(base_dir.join("data"));

        let candidates = dirs
            .iter()
            .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
            .collect();

        Self { candidates }
    }

    /// Build from `DRUGBANK_XML_PATH`, `DRUGBANK_BASE_DIR` and `HOME`.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var_os(BASE_DIR_VAR).map(PathBuf::from),
            env::var_os("HOME").map(PathBuf::from),
            env::var_os(XML_PATH_VAR).map(PathBuf::from),
        )
    }

    /// Standard locations for `base_dir` (default `.`) and `home_dir`, with
    /// `xml_path` tried before all of them.
    pub fn from_vars(
        base_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
        xml_path: Option<PathBuf>,
    ) -> Self {
        let base_dir = base_dir.unwrap_or_else(|| {
            info!("{BASE_DIR_VAR} not set, using current directory");
            PathBuf::from(".")
        });

        let mut config = Self::default_for(&base_dir, home_dir.as_deref());

        match xml_path {
            Some(path) => config.candidates.insert(0, path),
            None => info!("{XML_PATH_VAR} not set, searching standard locations"),
        }

        config
    }

    /// Candidate paths in lookup order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub fn locate(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidate_order() {
        let config = IndexConfig::default_for(Path::new("/app"), Some(Path::new("/home/u")));
        let expected: Vec<PathBuf> = vec![
            "/app/static/full database.xml".into(),
            "/app/static/drugbank.xml".into(),
            "/home/u/.data/drugbank/full database.xml".into(),
            "/home/u/.data/drugbank/drugbank.xml".into(),
            "/app/data/full database.xml".into(),
            "/app/data/drugbank.xml".into(),
        ];
        assert_eq!(config.candidates(), expected.as_slice());
    }

    #[test]
    fn test_default_without_home() {
        let config = IndexConfig::default_for(Path::new("/app"), None);
        assert_eq!(config.candidates().len(), 4);
    }

    #[test]
    fn test_xml_path_override_comes_first() {
        let config = IndexConfig::from_vars(
            Some("/app".into()),
            Some("/home/u".into()),
            Some("/srv/drugbank.xml".into()),
        );
        assert_eq!(config.candidates().len(), 7);
        assert_eq!(config.candidates()[0], PathBuf::from("/srv/drugbank.xml"));
        assert_eq!(
            config.candidates()[1],
            PathBuf::from("/app/static/full database.xml")
        );
    }

    #[test]
    fn test_unset_base_dir_uses_current_directory() {
        let config = IndexConfig::from_vars(None, Some("/home/u".into()), None);
        assert_eq!(
            config.candidates()[0],
            Path::new(".").join("static").join("full database.xml")
        );
        assert_eq!(
            config.candidates()[5],
            Path::new(".").join("data").join("drugbank.xml")
        );
    }

    #[test]
    fn test_vars_without_home() {
        let config = IndexConfig::from_vars(Some("/app".into()), None, None);
        assert_eq!(config.candidates().len(), 4);
        assert_eq!(config, IndexConfig::default_for(Path::new("/app"), None));
    }

    #[test]
    fn test_locate_first_existing_wins() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second.xml");
        let third = dir.path().join("third.xml");
        std::fs::write(&second, "<drugbank/>").unwrap();
        std::fs::write(&third, "<drugbank/>").unwrap();

        let config = IndexConfig::new(vec![dir.path().join("missing.xml"), second.clone(), third]);
        assert_eq!(config.locate(), Some(second.as_path()));
    }

    #[test]
    fn test_locate_none_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = IndexConfig::new(vec![dir.path().join("a.xml"), dir.path().join("b.xml")]);
        assert_eq!(config.locate(), None);
    }
}
