//! Fill pattern lookups over a host document.
//!
//! # Invariants
//! - Pattern elements whose definition cannot be read are skipped and
//!   reported as diagnostics, never silently dropped.

use super::{ElementId, HostDiagnostic, HostDocument, HostResult};
use log::warn;
use std::collections::BTreeMap;

/// Readable fill patterns keyed by name, plus skipped entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCatalog {
    pub patterns: BTreeMap<String, ElementId>,
    pub solid: Option<ElementId>,
    pub diagnostics: Vec<HostDiagnostic>,
}

impl PatternCatalog {
    /// Sorted pattern names for the pattern drop-downs.
    pub fn names(&self) -> Vec<String> {
        self.patterns.keys().cloned().collect()
    }

    pub fn id_of(&self, name: &str) -> Option<ElementId> {
        self.patterns.get(name).copied()
    }
}

/// Scans all fill patterns, collecting unreadable ones as diagnostics.
pub fn pattern_catalog<H: HostDocument + ?Sized>(host: &H) -> HostResult<PatternCatalog> {
    let elements = host.pattern_elements()?;
    let catalog = elements
        .into_iter()
        .fold(PatternCatalog::default(), |mut catalog, element| {
            match host.fill_pattern(element.id) {
                Ok(definition) => {
                    if definition.is_solid && catalog.solid.is_none() {
                        catalog.solid = Some(element.id);
                    }
                    catalog.patterns.insert(element.name, element.id);
                }
                Err(err) => {
                    warn!(
                        "event=pattern_scan module=host status=skipped pattern={} error={}",
                        element.name, err
                    );
                    catalog
                        .diagnostics
                        .push(HostDiagnostic::new(element.name, err.to_string()));
                }
            }
            catalog
        });
    Ok(catalog)
}

/// Returns the id of the host's solid fill pattern, if any.
pub fn solid_pattern_id<H: HostDocument + ?Sized>(host: &H) -> HostResult<Option<ElementId>> {
    Ok(pattern_catalog(host)?.solid)
}

/// Finds a pattern by name: exact case-insensitive match first, then the
/// first pattern whose name contains `name`.
pub fn find_pattern_by_name<H: HostDocument + ?Sized>(
    host: &H,
    name: &str,
) -> HostResult<Option<ElementId>> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(None);
    }
    let elements = host.pattern_elements()?;
    if let Some(exact) = elements
        .iter()
        .find(|element| element.name.to_lowercase() == needle)
    {
        return Ok(Some(exact.id));
    }
    Ok(elements
        .iter()
        .find(|element| element.name.to_lowercase().contains(&needle))
        .map(|element| element.id))
}

/// Initial drop-down selection: first sorted name containing "solid", else
/// the first name.
pub fn default_pattern_name(sorted_names: &[String]) -> Option<&str> {
    sorted_names
        .iter()
        .find(|name| name.to_lowercase().contains("solid"))
        .or_else(|| sorted_names.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::{default_pattern_name, find_pattern_by_name, pattern_catalog, solid_pattern_id};
    use crate::host::memory::InMemoryDocument;

    fn document() -> InMemoryDocument {
        let mut doc = InMemoryDocument::new();
        doc.add_fill_pattern("Diagonal crosshatch", false);
        doc.add_fill_pattern("<Solid fill>", true);
        doc.add_unreadable_pattern("Broken");
        doc.add_fill_pattern("Beton", false);
        doc
    }

    #[test]
    fn catalog_skips_unreadable_patterns_with_diagnostic() {
        let doc = document();
        let catalog = pattern_catalog(&doc).expect("pattern_catalog should succeed");
        assert_eq!(
            catalog.names(),
            vec!["<Solid fill>", "Beton", "Diagonal crosshatch"]
        );
        assert_eq!(catalog.diagnostics.len(), 1);
        assert_eq!(catalog.diagnostics[0].subject, "Broken");
        assert_eq!(catalog.solid, catalog.id_of("<Solid fill>"));
    }

    #[test]
    fn solid_pattern_absent_yields_none() {
        let mut doc = InMemoryDocument::new();
        doc.add_fill_pattern("Hatch", false);
        assert_eq!(solid_pattern_id(&doc).expect("solid_pattern_id should succeed"), None);
    }

    #[test]
    fn find_prefers_exact_then_partial() {
        let doc = document();
        let catalog = pattern_catalog(&doc).expect("pattern_catalog should succeed");
        assert_eq!(
            find_pattern_by_name(&doc, "beton").expect("find_pattern_by_name should succeed"),
            catalog.id_of("Beton")
        );
        assert_eq!(
            find_pattern_by_name(&doc, "CROSS").expect("find_pattern_by_name should succeed"),
            catalog.id_of("Diagonal crosshatch")
        );
        assert_eq!(
            find_pattern_by_name(&doc, "zink").expect("find_pattern_by_name should succeed"),
            None
        );
    }

    #[test]
    fn default_pattern_prefers_solid() {
        let names = vec!["Beton".to_string(), "<Solid fill>".to_string()];
        assert_eq!(default_pattern_name(&names), Some("<Solid fill>"));
        let plain = vec!["Beton".to_string()];
        assert_eq!(default_pattern_name(&plain), Some("Beton"));
        assert_eq!(default_pattern_name(&[]), None);
    }
}
