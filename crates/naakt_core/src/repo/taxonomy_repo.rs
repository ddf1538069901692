//! Taxonomy repository contracts and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the three taxonomy tables (names, attributes per name,
//!   applications per name).
//! - Keep the on-disk JSON layout inside the persistence boundary.
//!
//! # Invariants
//! - Writes are deterministic: keys and values are emitted in sorted order
//!   with 2-space indentation and unescaped non-ASCII text.
//! - A missing file reads as an empty table.
//! - A leading UTF-8 byte-order marker is ignored on read.
//! - Each save rewrites one whole file; there is no cross-file atomicity.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub const NAMES_FILE_NAME: &str = "names.json";
pub const ATTRIBUTES_FILE_NAME: &str = "attributes.json";
pub const APPLICATIONS_FILE_NAME: &str = "applications.json";

const NAMES_DESCRIPTION: &str = "Geldige NAA.K.T. NAMEN";
const ATTRIBUTES_DESCRIPTION: &str = "Geldige NAA.K.T. KENMERKEN per NAAM";
const APPLICATIONS_DESCRIPTION: &str = "Geldige NAA.K.T. TOEPASSINGEN per NAAM";

const BOM: char = '\u{feff}';

pub type RepoResult<T> = Result<T, RepoError>;

/// Per-name table: name -> set of members.
pub type ScopedEntries = BTreeMap<String, BTreeSet<String>>;

/// Repository error for taxonomy file access.
#[derive(Debug)]
pub enum RepoError {
    Io { path: PathBuf, source: io::Error },
    InvalidData { path: PathBuf, message: String },
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::InvalidData { path, message } => {
                write!(f, "invalid taxonomy data in {}: {message}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize taxonomy table: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidData { .. } => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Which per-name table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedTable {
    /// KENMERKEN per NAAM.
    Attributes,
    /// TOEPASSINGEN per NAAM.
    Applications,
}

impl Display for ScopedTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attributes => f.write_str("attributes"),
            Self::Applications => f.write_str("applications"),
        }
    }
}

/// Storage interface for taxonomy tables.
pub trait TaxonomyRepository {
    fn load_names(&self) -> RepoResult<BTreeSet<String>>;
    fn load_scoped(&self, table: ScopedTable) -> RepoResult<ScopedEntries>;
    fn save_names(&self, names: &BTreeSet<String>) -> RepoResult<()>;
    fn save_scoped(&self, table: ScopedTable, entries: &ScopedEntries) -> RepoResult<()>;
}

/// Locations of the three taxonomy files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyPaths {
    pub names: PathBuf,
    pub attributes: PathBuf,
    pub applications: PathBuf,
}

impl TaxonomyPaths {
    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            names: dir.join(NAMES_FILE_NAME),
            attributes: dir.join(ATTRIBUTES_FILE_NAME),
            applications: dir.join(APPLICATIONS_FILE_NAME),
        }
    }

    fn scoped(&self, table: ScopedTable) -> &Path {
        match table {
            ScopedTable::Attributes => &self.attributes,
            ScopedTable::Applications => &self.applications,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NamesDocument {
    #[serde(default)]
    beschrijving: String,
    #[serde(default)]
    namen: BTreeSet<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AttributesDocument {
    #[serde(default)]
    beschrijving: String,
    #[serde(default)]
    kenmerken_per_naam: ScopedEntries,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApplicationsDocument {
    #[serde(default)]
    beschrijving: String,
    #[serde(default)]
    toepassingen_per_naam: ScopedEntries,
}

/// JSON file-backed taxonomy repository.
#[derive(Debug, Clone)]
pub struct JsonTaxonomyRepository {
    paths: TaxonomyPaths,
}

impl JsonTaxonomyRepository {
    pub fn new(paths: TaxonomyPaths) -> Self {
        Self { paths }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(TaxonomyPaths::in_dir(dir))
    }

    pub fn paths(&self) -> &TaxonomyPaths {
        &self.paths
    }
}

impl TaxonomyRepository for JsonTaxonomyRepository {
    fn load_names(&self) -> RepoResult<BTreeSet<String>> {
        let document: Option<NamesDocument> = read_document(&self.paths.names)?;
        Ok(document.map(|doc| doc.namen).unwrap_or_default())
    }

    fn load_scoped(&self, table: ScopedTable) -> RepoResult<ScopedEntries> {
        let path = self.paths.scoped(table);
        let entries = match table {
            ScopedTable::Attributes => read_document::<AttributesDocument>(path)?
                .map(|doc| doc.kenmerken_per_naam),
            ScopedTable::Applications => read_document::<ApplicationsDocument>(path)?
                .map(|doc| doc.toepassingen_per_naam),
        };
        Ok(entries.unwrap_or_default())
    }

    fn save_names(&self, names: &BTreeSet<String>) -> RepoResult<()> {
        let document = NamesDocument {
            beschrijving: NAMES_DESCRIPTION.to_string(),
            namen: names.clone(),
        };
        write_document(&self.paths.names, &document)
    }

    fn save_scoped(&self, table: ScopedTable, entries: &ScopedEntries) -> RepoResult<()> {
        let path = self.paths.scoped(table);
        match table {
            ScopedTable::Attributes => write_document(
                path,
                &AttributesDocument {
                    beschrijving: ATTRIBUTES_DESCRIPTION.to_string(),
                    kenmerken_per_naam: entries.clone(),
                },
            ),
            ScopedTable::Applications => write_document(
                path,
                &ApplicationsDocument {
                    beschrijving: APPLICATIONS_DESCRIPTION.to_string(),
                    toepassingen_per_naam: entries.clone(),
                },
            ),
        }
    }
}

/// Reads one JSON document; `Ok(None)` when the file does not exist.
fn read_document<T: for<'de> Deserialize<'de>>(path: &Path) -> RepoResult<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };
    let body = content.strip_prefix(BOM).unwrap_or(&content);
    serde_json::from_str(body)
        .map(Some)
        .map_err(|err| RepoError::InvalidData {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> RepoResult<()> {
    let json = serde_json::to_string_pretty(document)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| RepoError::Io {
            path: parent.to_path_buf(),
            source: err,
        })?;
    }
    std::fs::write(path, json).map_err(|err| RepoError::Io {
        path: path.to_path_buf(),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::{JsonTaxonomyRepository, RepoError, ScopedTable, TaxonomyRepository};
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let repo = JsonTaxonomyRepository::in_dir(dir.path());
        assert!(repo.load_names().expect("load_names should succeed").is_empty());
        assert!(repo
            .load_scoped(ScopedTable::Attributes)
            .expect("load_scoped should succeed")
            .is_empty());
    }

    #[test]
    fn bom_prefixed_file_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let repo = JsonTaxonomyRepository::in_dir(dir.path());
        std::fs::write(
            &repo.paths().names,
            "\u{feff}{\"beschrijving\": \"x\", \"namen\": [\"hout\", \"beton\"]}",
        )
        .expect("fixture should be written");
        let names = repo.load_names().expect("load_names should succeed");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["beton", "hout"]);
    }

    #[test]
    fn malformed_file_is_invalid_data() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let repo = JsonTaxonomyRepository::in_dir(dir.path());
        std::fs::write(&repo.paths().applications, "{ not json")
            .expect("fixture should be written");
        let err = repo
            .load_scoped(ScopedTable::Applications)
            .expect_err("malformed table should fail to load");
        assert!(matches!(err, RepoError::InvalidData { .. }));
    }

    #[test]
    fn names_are_written_sorted_with_description() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let repo = JsonTaxonomyRepository::in_dir(dir.path());
        let names: BTreeSet<String> = ["steen", "beton", "één"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        repo.save_names(&names).expect("save_names should succeed");

        let written =
            std::fs::read_to_string(&repo.paths().names).expect("file should be readable");
        assert_eq!(
            written,
            "{\n  \"beschrijving\": \"Geldige NAA.K.T. NAMEN\",\n  \"namen\": [\n    \"beton\",\n    \"steen\",\n    \"één\"\n  ]\n}"
        );
    }

    #[test]
    fn scoped_tables_use_their_own_field_names() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let repo = JsonTaxonomyRepository::in_dir(dir.path());
        let mut entries = BTreeMap::new();
        entries.insert(
            "hout".to_string(),
            ["ntb", "generiek"].iter().map(|s| s.to_string()).collect(),
        );
        repo.save_scoped(ScopedTable::Applications, &entries)
            .expect("save_scoped should succeed");

        let text =
            std::fs::read_to_string(&repo.paths().applications).expect("file should be readable");
        let value: serde_json::Value =
            serde_json::from_str(&text).expect("file should hold valid json");
        assert_eq!(
            value["toepassingen_per_naam"]["hout"],
            serde_json::json!(["generiek", "ntb"])
        );
        assert_eq!(
            repo.load_scoped(ScopedTable::Applications).expect("load_scoped should succeed"),
            entries
        );
    }
}
