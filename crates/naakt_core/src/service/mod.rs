//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, matching and host calls into use-case APIs.
//! - Keep UI layers decoupled from storage and host document details.

pub mod provisioner;
pub mod session;
pub mod taxonomy_service;
