//! Repository layer for the controlled vocabulary.
//!
//! # Responsibility
//! - Define the storage contract for taxonomy tables.
//! - Isolate JSON file layout from the in-memory taxonomy store.
//!
//! # Invariants
//! - Repository APIs distinguish "file missing" (empty table) from
//!   "file unreadable" (`RepoError`).

pub mod taxonomy_repo;
