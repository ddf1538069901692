//! Canonical material name composition.
//!
//! # Responsibility
//! - Join the selected NAAM, KENMERK and TOEPASSING (+ free text) into the
//!   canonical `naam_kenmerk_toepassing[_eigen]` string.
//! - Carry completeness as an explicit flag.
//!
//! # Invariants
//! - Segment order is fixed: name, attribute, application, free text.
//! - A composed name is complete only when the three required segments were
//!   non-empty.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between canonical name segments.
pub const SEGMENT_SEPARATOR: char = '_';

/// Preview text shown while the triplet is incomplete.
pub const INCOMPLETE_PREVIEW: &str = "(selecteer naam, kenmerk en toepassing)";

const REQUIRED_SEGMENTS: usize = 3;

static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(" ").expect("valid space regex"));

/// Result of [`compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedName {
    text: String,
    complete: bool,
}

impl ComposedName {
    /// Joined non-empty segments, complete or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether name, attribute and application were all present.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the canonical name only when complete.
    pub fn canonical(&self) -> Option<&str> {
        self.complete.then_some(self.text.as_str())
    }

    /// Text for the live preview label.
    pub fn preview_text(&self) -> &str {
        self.canonical().unwrap_or(INCOMPLETE_PREVIEW)
    }
}

/// Composes a canonical material name.
///
/// Free text is trimmed, lowercased and has every internal space replaced
/// by `_`.
/// Empty segments are left out of the joined text.
pub fn compose(name: &str, attribute: &str, application: &str, free_text: &str) -> ComposedName {
    let required = [name.trim(), attribute.trim(), application.trim()];
    let complete = required.iter().all(|segment| !segment.is_empty());

    let mut segments: Vec<String> = required
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .collect();
    if let Some(extra) = normalize_free_text(free_text) {
        segments.push(extra);
    }

    ComposedName {
        text: segments.join(&SEGMENT_SEPARATOR.to_string()),
        complete,
    }
}

/// Normalizes the free-text suffix.
///
/// Returns `None` when nothing remains after trimming.
pub fn normalize_free_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    Some(
        SPACE_RE
            .replace_all(&lowered, SEGMENT_SEPARATOR.to_string().as_str())
            .into_owned(),
    )
}

/// Checks an externally supplied name for the three-segment minimum.
pub fn is_well_formed(text: &str) -> bool {
    let segments: Vec<&str> = text.split(SEGMENT_SEPARATOR).collect();
    segments.len() >= REQUIRED_SEGMENTS
        && segments[..REQUIRED_SEGMENTS]
            .iter()
            .all(|segment| !segment.trim().is_empty())
}
