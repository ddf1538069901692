//! Host document contracts.
//!
//! # Responsibility
//! - Describe the narrow slice of the CAD host document model used by the
//!   naming tool: materials, fill patterns, appearance assets, transactions.
//! - Keep host API details out of matching and provisioning logic.
//!
//! # Invariants
//! - Host mutations happen only inside an open transaction.
//! - Material names are compared exactly (case-sensitive) by the host.
//!
//! # See also
//! - `memory::InMemoryDocument` for the reference implementation.

use crate::model::presentation::{ColorSlot, HexColor};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod patterns;

pub type HostResult<T> = Result<T, HostError>;

/// Host element identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub i64);

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Material as enumerated from the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMaterial {
    pub id: ElementId,
    pub name: String,
    /// Attached appearance (render) asset, if any.
    pub appearance_asset: Option<ElementId>,
}

/// Fill pattern element as enumerated from the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternElement {
    pub id: ElementId,
    pub name: String,
}

/// Fill pattern definition read from a pattern element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPattern {
    pub is_solid: bool,
}

/// Non-fatal problem recorded while scanning or provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDiagnostic {
    /// What was being processed, e.g. a pattern or asset name.
    pub subject: String,
    pub message: String,
}

impl HostDiagnostic {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl Display for HostDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Host-side failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A mutation was attempted without an open transaction.
    NoTransaction,
    /// A transaction was started while another one is open.
    TransactionAlreadyOpen,
    ElementNotFound(ElementId),
    /// The host refused a name that is already taken.
    DuplicateName(String),
    /// Any other host API failure, carrying the host's message.
    Operation(String),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTransaction => write!(f, "no open transaction"),
            Self::TransactionAlreadyOpen => write!(f, "a transaction is already open"),
            Self::ElementNotFound(id) => write!(f, "element not found: {id}"),
            Self::DuplicateName(name) => write!(f, "name already in use: {name}"),
            Self::Operation(message) => write!(f, "{message}"),
        }
    }
}

impl Error for HostError {}

/// Host document operations consumed by the naming tool.
pub trait HostDocument {
    /// All materials in document order.
    fn materials(&self) -> HostResult<Vec<HostMaterial>>;
    /// All fill pattern elements in document order.
    fn pattern_elements(&self) -> HostResult<Vec<PatternElement>>;
    /// Reads the definition of one fill pattern element.
    fn fill_pattern(&self, id: ElementId) -> HostResult<FillPattern>;

    fn duplicate_material(&mut self, source: ElementId, new_name: &str) -> HostResult<ElementId>;
    fn duplicate_appearance_asset(
        &mut self,
        asset: ElementId,
        new_name: &str,
    ) -> HostResult<ElementId>;
    fn set_appearance_asset(&mut self, material: ElementId, asset: ElementId) -> HostResult<()>;
    fn set_pattern(&mut self, material: ElementId, slot: ColorSlot, pattern: ElementId)
        -> HostResult<()>;
    fn set_pattern_color(
        &mut self,
        material: ElementId,
        slot: ColorSlot,
        color: HexColor,
    ) -> HostResult<()>;

    fn begin_transaction(&mut self, label: &str) -> HostResult<()>;
    fn commit_transaction(&mut self) -> HostResult<()>;
    fn rollback_transaction(&mut self) -> HostResult<()>;

    /// Exact, case-sensitive material name lookup.
    fn material_exists(&self, name: &str) -> HostResult<bool> {
        Ok(self.materials()?.iter().any(|material| material.name == name))
    }
}
