//! Core domain logic for the NAA.K.T. material name generator.
//! This crate is the single source of truth for naming invariants.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::NaaktConfig;
pub use host::memory::{Fault, InMemoryDocument};
pub use host::patterns::{
    default_pattern_name, find_pattern_by_name, pattern_catalog, solid_pattern_id, PatternCatalog,
};
pub use host::{
    ElementId, FillPattern, HostDiagnostic, HostDocument, HostError, HostMaterial, HostResult,
    PatternElement,
};
pub use logging::{
    default_log_level, finalize, init_logging, log_failure, logging_status, LogConfig,
};
pub use model::naming::{compose, is_well_formed, ComposedName, INCOMPLETE_PREVIEW};
pub use model::presentation::{
    contrast_text_color, ColorParseError, ColorSlot, HexColor, PresentationConfig,
};
pub use model::taxonomy::{TaxonomyLevel, DEFAULT_MEMBERS};
pub use repo::taxonomy_repo::{
    JsonTaxonomyRepository, RepoError, RepoResult, ScopedEntries, ScopedTable, TaxonomyPaths,
    TaxonomyRepository,
};
pub use search::keyword_match::{find_closest, keywords_for, KeywordMatch, MatchCandidate};
pub use service::provisioner::{
    MaterialProvisioner, ProvisionError, ProvisionPlan, ProvisionReport, ProvisionResult,
};
pub use service::session::{NamingSession, SessionError, SessionResult, SessionState};
pub use service::taxonomy_service::{
    LoadReport, TaxonomyError, TaxonomyResult, TaxonomyStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
