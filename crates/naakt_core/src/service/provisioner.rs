//! Material provisioning use-case.
//!
//! # Responsibility
//! - Resolve a source material for a NAAM via keyword matching.
//! - Duplicate it under the canonical name and apply presentation settings
//!   inside one host transaction.
//!
//! # Invariants
//! - Precondition failures (`AlreadyExists`, `NoSourceMaterial`,
//!   `IncompleteName`) happen before any host mutation.
//! - Any failure after the transaction starts rolls it back; the host
//!   document is unchanged unless the whole operation succeeds.
//! - Appearance asset duplication failure is a warning, not an abort.

use crate::host::patterns::solid_pattern_id;
use crate::host::{ElementId, HostDiagnostic, HostDocument, HostError, HostMaterial};
use crate::model::naming::is_well_formed;
use crate::model::presentation::{ColorSlot, PresentationConfig};
use crate::search::keyword_match::find_closest;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Transaction label shown in the host's undo history.
pub const TRANSACTION_LABEL: &str = "NAA.K.T. Materiaal aanmaken";

pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Failure of a provisioning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// The canonical name is missing one of its three required segments.
    IncompleteName(String),
    /// A material with this exact name already exists.
    AlreadyExists(String),
    /// The host document has no material to duplicate.
    NoSourceMaterial,
    /// Host failure; the transaction (if any) was rolled back.
    Host(HostError),
}

impl ProvisionError {
    /// Short explanation for the user, without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::IncompleteName(_) => {
                "Geen geldige materiaalnaam. Selecteer naam, kenmerk en toepassing.".to_string()
            }
            Self::AlreadyExists(name) => format!("Materiaal '{name}' bestaat al in het model."),
            Self::NoSourceMaterial => "Geen bronmateriaal gevonden in het model.".to_string(),
            Self::Host(err) => format!("Fout bij aanmaken materiaal:\n\n{err}"),
        }
    }
}

impl Display for ProvisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteName(name) => write!(f, "incomplete material name `{name}`"),
            Self::AlreadyExists(name) => write!(f, "material already exists: {name}"),
            Self::NoSourceMaterial => write!(f, "no source material found"),
            Self::Host(err) => write!(f, "host operation failed: {err}"),
        }
    }
}

impl Error for ProvisionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for ProvisionError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

/// Validated request, ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub new_name: String,
    pub source: HostMaterial,
    /// Source was taken as first-candidate fallback (no keyword matched).
    pub fallback_source: bool,
}

/// Result of a successful [`MaterialProvisioner::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub material: ElementId,
    pub name: String,
    pub source_name: String,
    pub asset_duplicated: bool,
    pub diagnostics: Vec<HostDiagnostic>,
}

/// Creates standardized materials in a host document.
pub struct MaterialProvisioner<'doc, H: HostDocument + ?Sized> {
    host: &'doc mut H,
}

impl<'doc, H: HostDocument + ?Sized> MaterialProvisioner<'doc, H> {
    pub fn new(host: &'doc mut H) -> Self {
        Self { host }
    }

    /// Checks preconditions and resolves the source material without
    /// mutating the host.
    pub fn plan(&self, name: &str, new_name: &str) -> ProvisionResult<ProvisionPlan> {
        if !is_well_formed(new_name) {
            return Err(ProvisionError::IncompleteName(new_name.to_string()));
        }
        if self.host.material_exists(new_name)? {
            return Err(ProvisionError::AlreadyExists(new_name.to_string()));
        }

        let materials = self.host.materials()?;
        let found = find_closest(name, &materials).ok_or(ProvisionError::NoSourceMaterial)?;
        info!(
            "event=source_match module=provision name={} source={} score={} fallback={}",
            name, found.candidate.name, found.score, found.fallback
        );
        Ok(ProvisionPlan {
            new_name: new_name.to_string(),
            source: found.candidate.clone(),
            fallback_source: found.fallback,
        })
    }

    /// Creates `new_name` from the best-matching source for `name`.
    pub fn create(
        &mut self,
        name: &str,
        new_name: &str,
        presentation: &PresentationConfig,
    ) -> ProvisionResult<ProvisionReport> {
        let plan = self.plan(name, new_name)?;
        self.execute(&plan, presentation)
    }

    /// Executes a previously computed plan in one transaction.
    pub fn execute(
        &mut self,
        plan: &ProvisionPlan,
        presentation: &PresentationConfig,
    ) -> ProvisionResult<ProvisionReport> {
        let solid = solid_pattern_id(&*self.host)?;

        self.host.begin_transaction(TRANSACTION_LABEL)?;
        match self.duplicate_and_style(plan, presentation, solid) {
            Ok(report) => {
                if let Err(err) = self.host.commit_transaction() {
                    self.rollback_quietly();
                    return Err(err.into());
                }
                info!(
                    "event=material_create module=provision status=ok name={} source={} asset_duplicated={}",
                    report.name, report.source_name, report.asset_duplicated
                );
                Ok(report)
            }
            Err(err) => {
                self.rollback_quietly();
                warn!(
                    "event=material_create module=provision status=rolled_back name={} error={}",
                    plan.new_name, err
                );
                Err(err.into())
            }
        }
    }

    fn duplicate_and_style(
        &mut self,
        plan: &ProvisionPlan,
        presentation: &PresentationConfig,
        solid: Option<ElementId>,
    ) -> Result<ProvisionReport, HostError> {
        let mut diagnostics = Vec::new();
        let material = self
            .host
            .duplicate_material(plan.source.id, &plan.new_name)?;

        let mut asset_duplicated = false;
        if let Some(asset) = plan.source.appearance_asset {
            match self.copy_appearance_asset(material, asset, &plan.new_name) {
                Ok(()) => asset_duplicated = true,
                Err(err) => {
                    warn!(
                        "event=asset_duplicate module=provision status=skipped name={} error={}",
                        plan.new_name, err
                    );
                    diagnostics.push(HostDiagnostic::new(
                        format!("appearance asset of {}", plan.source.name),
                        err.to_string(),
                    ));
                }
            }
        }

        for slot in ColorSlot::ALL {
            let pattern = if slot.is_background() {
                solid
            } else {
                presentation.foreground_pattern(slot)
            };
            if let Some(pattern) = pattern {
                self.host.set_pattern(material, slot, pattern)?;
            }
            self.host
                .set_pattern_color(material, slot, presentation.color(slot))?;
        }
        if solid.is_none() {
            diagnostics.push(HostDiagnostic::new(
                "solid fill",
                "no solid fill pattern in document; background patterns unchanged",
            ));
        }

        Ok(ProvisionReport {
            material,
            name: plan.new_name.clone(),
            source_name: plan.source.name.clone(),
            asset_duplicated,
            diagnostics,
        })
    }

    /// Duplicates `asset` under `new_name` and attaches it to `material`.
    fn copy_appearance_asset(
        &mut self,
        material: ElementId,
        asset: ElementId,
        new_name: &str,
    ) -> Result<(), HostError> {
        let new_asset = self.host.duplicate_appearance_asset(asset, new_name)?;
        self.host.set_appearance_asset(material, new_asset)
    }

    fn rollback_quietly(&mut self) {
        if let Err(err) = self.host.rollback_transaction() {
            warn!("event=transaction_rollback module=provision status=error error={err}");
        }
    }
}
