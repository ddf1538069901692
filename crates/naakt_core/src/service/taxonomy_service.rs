//! Taxonomy store use-cases.
//!
//! # Responsibility
//! - Hold the controlled vocabulary in memory after startup load.
//! - Validate and apply incremental additions, persisting affected tables.
//!
//! # Invariants
//! - Names are unique and stored trimmed + lowercase.
//! - Every known name has attribute and application sets seeded with the
//!   default members.
//! - A rejected addition never mutates state or touches disk.
//! - Load never fails as a whole: unreadable tables degrade to empty.

use crate::model::taxonomy::{default_members, normalize_entry, TaxonomyLevel};
use crate::repo::taxonomy_repo::{RepoError, ScopedEntries, ScopedTable, TaxonomyRepository};
use log::{error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

/// Error for taxonomy additions.
#[derive(Debug)]
pub enum TaxonomyError {
    /// Input was blank after trimming.
    Empty(TaxonomyLevel),
    /// Entry already present (for attributes/applications: within the name).
    Duplicate { level: TaxonomyLevel, value: String },
    /// Owning name for an attribute/application is not known.
    UnknownName(String),
    /// The in-memory addition succeeded but persisting it failed.
    Storage(RepoError),
}

impl Display for TaxonomyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(level) => write!(f, "{level} mag niet leeg zijn"),
            Self::Duplicate { level, value } => write!(f, "{level} '{value}' bestaat al"),
            Self::UnknownName(name) => write!(f, "NAAM '{name}' is onbekend"),
            Self::Storage(err) => write!(f, "opslaan mislukt: {err}"),
        }
    }
}

impl Error for TaxonomyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaxonomyError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Table that failed to load and was left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedTable {
    pub table: &'static str,
    pub message: String,
}

/// Summary of a [`TaxonomyStore::load`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub names: usize,
    pub degraded: Vec<DegradedTable>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty()
    }
}

/// In-memory controlled vocabulary backed by a repository.
pub struct TaxonomyStore<R: TaxonomyRepository> {
    repo: R,
    names: BTreeSet<String>,
    attributes: ScopedEntries,
    applications: ScopedEntries,
}

impl<R: TaxonomyRepository> TaxonomyStore<R> {
    /// Creates an empty store; call [`Self::load`] to read persisted tables.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            names: BTreeSet::new(),
            attributes: ScopedEntries::new(),
            applications: ScopedEntries::new(),
        }
    }

    /// Creates a store and loads all tables.
    pub fn open(repo: R) -> (Self, LoadReport) {
        let mut store = Self::new(repo);
        let report = store.load();
        (store, report)
    }

    /// (Re)loads all three tables from the repository.
    ///
    /// Each unreadable table is logged and left empty. Loaded entries are
    /// normalized like new input; entries that collide after normalization
    /// are merged and blank ones dropped.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();

        self.names = normalize_set(degrade(self.repo.load_names(), "names", &mut report));
        self.attributes = normalize_scoped(degrade(
            self.repo.load_scoped(ScopedTable::Attributes),
            "attributes",
            &mut report,
        ));
        self.applications = normalize_scoped(degrade(
            self.repo.load_scoped(ScopedTable::Applications),
            "applications",
            &mut report,
        ));
        report.names = self.names.len();

        info!(
            "event=taxonomy_load module=taxonomy status={} names={} attributes={} applications={}",
            if report.is_clean() { "ok" } else { "degraded" },
            self.names.len(),
            self.attributes.len(),
            self.applications.len()
        );
        report
    }

    /// Sorted list of all names.
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        normalize_entry(name).is_some_and(|key| self.names.contains(&key))
    }

    /// Sorted attributes of `name`; empty for unknown names.
    pub fn attributes_for(&self, name: &str) -> Vec<String> {
        members_of(&self.attributes, name)
    }

    /// Sorted applications of `name`; empty for unknown names.
    pub fn applications_for(&self, name: &str) -> Vec<String> {
        members_of(&self.applications, name)
    }

    /// Adds a name, seeds both sub-tables with the defaults and persists all
    /// three tables.
    ///
    /// Returns the normalized name.
    pub fn add_name(&mut self, raw: &str) -> TaxonomyResult<String> {
        let name = normalize_entry(raw).ok_or(TaxonomyError::Empty(TaxonomyLevel::Name))?;
        if self.names.contains(&name) {
            return Err(TaxonomyError::Duplicate {
                level: TaxonomyLevel::Name,
                value: name,
            });
        }

        self.names.insert(name.clone());
        self.attributes
            .insert(name.clone(), default_members().into_iter().collect());
        self.applications
            .insert(name.clone(), default_members().into_iter().collect());
        info!("event=taxonomy_add module=taxonomy level=name value={name}");

        self.repo.save_names(&self.names)?;
        self.repo.save_scoped(ScopedTable::Attributes, &self.attributes)?;
        self.repo
            .save_scoped(ScopedTable::Applications, &self.applications)?;
        Ok(name)
    }

    /// Adds an attribute to a known name and persists the attribute table.
    pub fn add_attribute(&mut self, name: &str, raw: &str) -> TaxonomyResult<String> {
        self.add_scoped(ScopedTable::Attributes, name, raw)
    }

    /// Adds an application to a known name and persists the application table.
    pub fn add_application(&mut self, name: &str, raw: &str) -> TaxonomyResult<String> {
        self.add_scoped(ScopedTable::Applications, name, raw)
    }

    fn add_scoped(&mut self, table: ScopedTable, name: &str, raw: &str) -> TaxonomyResult<String> {
        let level = match table {
            ScopedTable::Attributes => TaxonomyLevel::Attribute,
            ScopedTable::Applications => TaxonomyLevel::Application,
        };
        let owner = normalize_entry(name)
            .filter(|owner| self.names.contains(owner))
            .ok_or_else(|| TaxonomyError::UnknownName(name.trim().to_string()))?;
        let value = normalize_entry(raw).ok_or(TaxonomyError::Empty(level))?;

        let entries = match table {
            ScopedTable::Attributes => &mut self.attributes,
            ScopedTable::Applications => &mut self.applications,
        };
        let duplicate = match entries.get(&owner) {
            Some(members) => members.contains(&value),
            None => default_members().contains(&value),
        };
        if duplicate {
            return Err(TaxonomyError::Duplicate { level, value });
        }
        entries
            .entry(owner.clone())
            .or_insert_with(|| default_members().into_iter().collect())
            .insert(value.clone());
        info!("event=taxonomy_add module=taxonomy level={table} name={owner} value={value}");

        self.repo.save_scoped(table, entries)?;
        Ok(value)
    }
}

fn degrade<T: Default>(
    result: Result<T, RepoError>,
    table: &'static str,
    report: &mut LoadReport,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("event=taxonomy_load module=taxonomy status=error table={table} error={err}");
            report.degraded.push(DegradedTable {
                table,
                message: err.to_string(),
            });
            T::default()
        }
    }
}

fn normalize_set(raw: BTreeSet<String>) -> BTreeSet<String> {
    raw.iter().filter_map(|entry| normalize_entry(entry)).collect()
}

fn normalize_scoped(raw: ScopedEntries) -> ScopedEntries {
    let mut normalized = ScopedEntries::new();
    for (name, members) in raw {
        if let Some(key) = normalize_entry(&name) {
            normalized
                .entry(key)
                .or_default()
                .extend(normalize_set(members));
        }
    }
    normalized
}

fn members_of(entries: &ScopedEntries, name: &str) -> Vec<String> {
    normalize_entry(name)
        .and_then(|key| entries.get(&key))
        .map(|members| members.iter().cloned().collect())
        .unwrap_or_default()
}
