//! Controlled vocabulary model.
//!
//! # Responsibility
//! - Define the three taxonomy levels (NAAM, KENMERK, TOEPASSING).
//! - Normalize raw user input into stored vocabulary entries.
//!
//! # Invariants
//! - Stored entries are trimmed and lowercase.
//! - Every name starts with the default attribute/application members.

use std::fmt::{Display, Formatter};

/// Default members seeded into both sub-tables when a name is created.
pub const DEFAULT_MEMBERS: [&str; 2] = ["generiek", "ntb"];

/// Member preselected in attribute/application choices when present.
pub const PREFERRED_MEMBER: &str = "generiek";

/// Taxonomy level of one vocabulary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyLevel {
    /// Top-level material category (NAAM).
    Name,
    /// Qualifier scoped to one name (KENMERK).
    Attribute,
    /// Intended usage scoped to one name (TOEPASSING).
    Application,
}

impl TaxonomyLevel {
    /// Dutch label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "NAAM",
            Self::Attribute => "KENMERK",
            Self::Application => "TOEPASSING",
        }
    }
}

impl Display for TaxonomyLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalizes one raw vocabulary entry.
///
/// Returns `None` for blank input.
pub fn normalize_entry(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Returns the default sub-table members as owned strings.
pub fn default_members() -> Vec<String> {
    DEFAULT_MEMBERS.iter().map(|value| value.to_string()).collect()
}

/// Picks the index to preselect in a sorted choice list.
///
/// Prefers [`PREFERRED_MEMBER`], falls back to the first entry.
pub fn preferred_index(choices: &[String]) -> Option<usize> {
    if choices.is_empty() {
        return None;
    }
    Some(
        choices
            .iter()
            .position(|value| value == PREFERRED_MEMBER)
            .unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::{normalize_entry, preferred_index, TaxonomyLevel};

    #[test]
    fn normalize_entry_trims_and_lowercases() {
        assert_eq!(normalize_entry("  Beton ").as_deref(), Some("beton"));
        assert_eq!(normalize_entry("ÉÉN").as_deref(), Some("één"));
        assert_eq!(normalize_entry("   "), None);
    }

    #[test]
    fn preferred_index_picks_generiek_then_first() {
        let with_default = vec!["buiten".to_string(), "generiek".to_string()];
        assert_eq!(preferred_index(&with_default), Some(1));

        let without_default = vec!["buiten".to_string(), "binnen".to_string()];
        assert_eq!(preferred_index(&without_default), Some(0));

        assert_eq!(preferred_index(&[]), None);
    }

    #[test]
    fn level_labels_are_dutch() {
        assert_eq!(TaxonomyLevel::Attribute.to_string(), "KENMERK");
    }
}
