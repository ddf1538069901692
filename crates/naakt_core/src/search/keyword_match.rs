//! Keyword scoring of host materials against a taxonomy name.
//!
//! # Responsibility
//! - Map a NAAM to its synonym keywords.
//! - Pick the existing host material that best matches the NAAM.
//!
//! # Invariants
//! - Scoring is a linear scan in input order; ties keep the earliest
//!   candidate.
//! - An empty candidate list never produces a match.

use crate::host::HostMaterial;
use std::borrow::Cow;

const EXACT_SCORE: u32 = 10;
const PREFIX_SCORE: u32 = 5;
const CONTAINS_SCORE: u32 = 2;

const KEYWORD_TABLE: &[(&str, &[&str])] = &[
    ("beton", &["beton", "concrete", "cementgebonden"]),
    (
        "hout",
        &["hout", "wood", "timber", "eiken", "grenen", "multiplex", "mdf", "osb"],
    ),
    (
        "isolatie",
        &[
            "isolatie",
            "insulation",
            "eps",
            "xps",
            "pir",
            "pur",
            "minerale wol",
            "glaswol",
            "rotswol",
        ],
    ),
    (
        "metaal",
        &["metaal", "metal", "staal", "steel", "aluminium", "alu", "zink", "koper"],
    ),
    (
        "steen",
        &["steen", "stone", "baksteen", "brick", "kalkzandsteen", "natuursteen"],
    ),
    ("gips", &["gips", "gypsum", "gyproc", "fermacell"]),
    ("glas", &["glas", "glass", "beglazing"]),
    (
        "folie",
        &["folie", "dampremmend", "dampopen", "membraan", "barrier"],
    ),
    ("lucht", &["lucht", "air", "spouw", "cavity"]),
    (
        "kunststof",
        &["kunststof", "plastic", "pvc", "pe", "hdpe", "ldpe"],
    ),
    ("bitumen", &["bitumen", "dakbedekking", "roofing"]),
    ("verf", &["verf", "paint", "coating", "latex"]),
    ("tegels", &["tegel", "tile", "keramisch", "ceramic"]),
    ("mortel", &["mortel", "mortar", "voeg", "specie"]),
];

/// Anything with a display name that can be scored.
pub trait MatchCandidate {
    fn display_name(&self) -> &str;
}

impl MatchCandidate for HostMaterial {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl MatchCandidate for &str {
    fn display_name(&self) -> &str {
        self
    }
}

impl MatchCandidate for String {
    fn display_name(&self) -> &str {
        self
    }
}

/// Outcome of [`find_closest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a, C> {
    pub candidate: &'a C,
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub score: u32,
    /// `true` when nothing scored and the first candidate was taken.
    pub fallback: bool,
}

/// Names that have a dedicated keyword list, in table order.
pub fn known_names() -> impl Iterator<Item = &'static str> {
    KEYWORD_TABLE.iter().map(|(name, _)| *name)
}

/// Synonym keywords for a taxonomy name.
///
/// Unknown names fall back to the lowercased name itself.
pub fn keywords_for(name: &str) -> Vec<Cow<'static, str>> {
    let key = name.trim().to_lowercase();
    match KEYWORD_TABLE.iter().find(|(entry, _)| *entry == key) {
        Some((_, keywords)) => keywords.iter().map(|kw| Cow::Borrowed(*kw)).collect(),
        None => vec![Cow::Owned(key)],
    }
}

/// Scores one candidate name against a keyword list.
///
/// Every contained keyword adds 10 on exact equality, 5 on prefix, else 2.
pub fn score_candidate<K: AsRef<str>>(candidate_name: &str, keywords: &[K]) -> u32 {
    let lowered = candidate_name.to_lowercase();
    keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|keyword| !keyword.is_empty() && lowered.contains(keyword))
        .map(|keyword| {
            if lowered == keyword {
                EXACT_SCORE
            } else if lowered.starts_with(keyword) {
                PREFIX_SCORE
            } else {
                CONTAINS_SCORE
            }
        })
        .sum()
}

/// Selects the candidate whose display name best matches `name`.
///
/// Returns `None` only for an empty candidate list.
pub fn find_closest<'a, C: MatchCandidate>(
    name: &str,
    candidates: &'a [C],
) -> Option<KeywordMatch<'a, C>> {
    let first = candidates.first()?;
    let keywords = keywords_for(name);

    let mut best: Option<KeywordMatch<'a, C>> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = score_candidate(candidate.display_name(), &keywords);
        let current_best = best.as_ref().map_or(0, |found| found.score);
        if score > current_best {
            best = Some(KeywordMatch {
                candidate,
                index,
                score,
                fallback: false,
            });
        }
    }

    Some(best.unwrap_or(KeywordMatch {
        candidate: first,
        index: 0,
        score: 0,
        fallback: true,
    }))
}
