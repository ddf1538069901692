//! Fuzzy lookup of existing host materials.
//!
//! # Responsibility
//! - Score host material names against taxonomy synonyms.
//! - Keep matching pure so it can run on any candidate list.

pub mod keyword_match;
