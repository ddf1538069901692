//! Domain model for material naming.
//!
//! # Responsibility
//! - Define the controlled vocabulary and its normalization rules.
//! - Compose canonical material names.
//! - Describe presentation settings applied to created materials.
//!
//! # Invariants
//! - Model code is pure: no file or host document access.

pub mod naming;
pub mod presentation;
pub mod taxonomy;
