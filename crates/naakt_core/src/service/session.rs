//! Naming session: explicit state behind the generator dialog.
//!
//! # Responsibility
//! - Track the selected NAAM/KENMERK/TOEPASSING, free text and presentation
//!   settings between UI events.
//! - Route "add entry", "copy" and "create" actions to core services.
//!
//! # Invariants
//! - Attribute/application choices always mirror the store for the selected
//!   name.
//! - Selections are only accepted from the current choice lists.
//! - `create_material` runs only in `SessionState::ReadyToCreate`.

use crate::host::patterns::{default_pattern_name, PatternCatalog};
use crate::host::HostDocument;
use crate::logging::log_failure;
use crate::model::naming::{compose, ComposedName};
use crate::model::presentation::{ColorSlot, HexColor, PresentationConfig};
use crate::model::taxonomy::{preferred_index, TaxonomyLevel};
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::service::provisioner::{
    MaterialProvisioner, ProvisionError, ProvisionPlan, ProvisionReport,
};
use crate::service::taxonomy_service::{TaxonomyError, TaxonomyStore};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Which actions the dialog currently allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No name selected.
    Idle,
    /// Name selected but the triplet is incomplete.
    NamingSelected,
    /// Canonical name complete; copy and create are enabled.
    ReadyToCreate,
}

#[derive(Debug)]
pub enum SessionError {
    /// Attribute/application action without a selected name.
    NoNameSelected,
    /// Value is not among the current choices for its level.
    NotAChoice { level: TaxonomyLevel, value: String },
    /// Copy/create requested while the name is incomplete.
    Incomplete,
    Taxonomy(TaxonomyError),
    Provision(ProvisionError),
}

impl SessionError {
    /// Short explanation for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoNameSelected => "Selecteer eerst een NAAM.".to_string(),
            Self::NotAChoice { level, value } => format!("{level} '{value}' is geen geldige keuze."),
            Self::Incomplete => "Geen geldige materiaalnaam. Selecteer naam, kenmerk en toepassing."
                .to_string(),
            Self::Taxonomy(TaxonomyError::Storage(_)) => {
                "Toegevoegd, maar opslaan naar schijf is mislukt.".to_string()
            }
            Self::Taxonomy(TaxonomyError::UnknownName(_)) => "Selecteer eerst een NAAM.".to_string(),
            Self::Taxonomy(
                TaxonomyError::Empty(level) | TaxonomyError::Duplicate { level, .. },
            ) => format!("{level} bestaat al of is ongeldig."),
            Self::Provision(err) => err.user_message(),
        }
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoNameSelected => write!(f, "no name selected"),
            Self::NotAChoice { level, value } => write!(f, "`{value}` is not a valid {level}"),
            Self::Incomplete => write!(f, "material name is incomplete"),
            Self::Taxonomy(err) => write!(f, "{err}"),
            Self::Provision(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Taxonomy(err) => Some(err),
            Self::Provision(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaxonomyError> for SessionError {
    fn from(value: TaxonomyError) -> Self {
        Self::Taxonomy(value)
    }
}

impl From<ProvisionError> for SessionError {
    fn from(value: ProvisionError) -> Self {
        Self::Provision(value)
    }
}

/// State object passed to every dialog event handler.
pub struct NamingSession<R: TaxonomyRepository> {
    store: TaxonomyStore<R>,
    name: Option<String>,
    attribute_choices: Vec<String>,
    application_choices: Vec<String>,
    attribute: Option<String>,
    application: Option<String>,
    free_text: String,
    presentation: PresentationConfig,
}

impl<R: TaxonomyRepository> NamingSession<R> {
    /// Starts a session, selecting the first name if the store has any.
    pub fn start(store: TaxonomyStore<R>) -> Self {
        let first = store.names().into_iter().next();
        let mut session = Self {
            store,
            name: None,
            attribute_choices: Vec::new(),
            application_choices: Vec::new(),
            attribute: None,
            application: None,
            free_text: String::new(),
            presentation: PresentationConfig::default(),
        };
        if let Some(name) = first {
            session.apply_name(name);
        }
        session
    }

    pub fn store(&self) -> &TaxonomyStore<R> {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        match (&self.name, self.composed().is_complete()) {
            (None, _) => SessionState::Idle,
            (Some(_), false) => SessionState::NamingSelected,
            (Some(_), true) => SessionState::ReadyToCreate,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.store.names()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn selected_attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn selected_application(&self) -> Option<&str> {
        self.application.as_deref()
    }

    pub fn attribute_choices(&self) -> &[String] {
        &self.attribute_choices
    }

    pub fn application_choices(&self) -> &[String] {
        &self.application_choices
    }

    /// Selects a name and refills both choice lists, preselecting
    /// `generiek` where available.
    pub fn select_name(&mut self, name: &str) -> SessionResult<()> {
        let known = self
            .store
            .names()
            .into_iter()
            .find(|candidate| candidate == name.trim())
            .ok_or_else(|| SessionError::NotAChoice {
                level: TaxonomyLevel::Name,
                value: name.to_string(),
            })?;
        self.apply_name(known);
        Ok(())
    }

    pub fn select_attribute(&mut self, value: &str) -> SessionResult<()> {
        self.attribute = Some(pick(&self.attribute_choices, TaxonomyLevel::Attribute, value)?);
        Ok(())
    }

    pub fn select_application(&mut self, value: &str) -> SessionResult<()> {
        self.application = Some(pick(
            &self.application_choices,
            TaxonomyLevel::Application,
            value,
        )?);
        Ok(())
    }

    pub fn set_free_text(&mut self, text: &str) {
        self.free_text = text.to_string();
    }

    /// Current composition of the selected segments.
    pub fn composed(&self) -> ComposedName {
        compose(
            self.name.as_deref().unwrap_or_default(),
            self.attribute.as_deref().unwrap_or_default(),
            self.application.as_deref().unwrap_or_default(),
            &self.free_text,
        )
    }

    /// Adds a new name and selects it.
    pub fn add_name(&mut self, raw: &str) -> SessionResult<String> {
        let added = self.store.add_name(raw)?;
        self.apply_name(added.clone());
        Ok(added)
    }

    /// Adds an attribute to the selected name and selects it.
    pub fn add_attribute(&mut self, raw: &str) -> SessionResult<String> {
        let name = self.name.clone().ok_or(SessionError::NoNameSelected)?;
        let added = self.store.add_attribute(&name, raw)?;
        self.attribute_choices = self.store.attributes_for(&name);
        self.attribute = Some(added.clone());
        Ok(added)
    }

    /// Adds an application to the selected name and selects it.
    pub fn add_application(&mut self, raw: &str) -> SessionResult<String> {
        let name = self.name.clone().ok_or(SessionError::NoNameSelected)?;
        let added = self.store.add_application(&name, raw)?;
        self.application_choices = self.store.applications_for(&name);
        self.application = Some(added.clone());
        Ok(added)
    }

    pub fn presentation(&self) -> &PresentationConfig {
        &self.presentation
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: HexColor) {
        self.presentation.set_color(slot, color);
    }

    /// Selects surface/cut foreground patterns by catalog name.
    ///
    /// Unknown names clear the selection so the source pattern is kept.
    pub fn select_patterns(&mut self, catalog: &PatternCatalog, surface: &str, cut: &str) {
        self.presentation.surface_pattern = catalog.id_of(surface);
        self.presentation.cut_pattern = catalog.id_of(cut);
    }

    /// Preselects the solid pattern (or the first one) for both modes.
    pub fn apply_default_patterns(&mut self, catalog: &PatternCatalog) {
        let names = catalog.names();
        let default = default_pattern_name(&names).and_then(|name| catalog.id_of(name));
        self.presentation.surface_pattern = default;
        self.presentation.cut_pattern = default;
    }

    /// Canonical name for the clipboard.
    pub fn copy_text(&self) -> SessionResult<String> {
        self.composed()
            .canonical()
            .map(str::to_string)
            .ok_or(SessionError::Incomplete)
    }

    /// Checks preconditions and returns the source material that would be
    /// duplicated, for the confirmation prompt.
    pub fn plan_material<H: HostDocument + ?Sized>(
        &self,
        host: &mut H,
    ) -> SessionResult<ProvisionPlan> {
        let (name, canonical) = self.ready_name()?;
        Ok(MaterialProvisioner::new(host).plan(&name, &canonical)?)
    }

    /// Creates the composed material in the host document.
    pub fn create_material<H: HostDocument + ?Sized>(
        &self,
        host: &mut H,
    ) -> SessionResult<ProvisionReport> {
        let (name, canonical) = self.ready_name()?;
        MaterialProvisioner::new(host)
            .create(&name, &canonical, &self.presentation)
            .map_err(|err| {
                log_failure("material_create", &err);
                SessionError::Provision(err)
            })
    }

    fn ready_name(&self) -> SessionResult<(String, String)> {
        let composed = self.composed();
        match (&self.name, composed.canonical()) {
            (Some(name), Some(canonical)) => Ok((name.clone(), canonical.to_string())),
            _ => Err(SessionError::Incomplete),
        }
    }

    fn apply_name(&mut self, name: String) {
        self.attribute_choices = self.store.attributes_for(&name);
        self.application_choices = self.store.applications_for(&name);
        self.attribute =
            preferred_index(&self.attribute_choices).map(|i| self.attribute_choices[i].clone());
        self.application =
            preferred_index(&self.application_choices).map(|i| self.application_choices[i].clone());
        self.name = Some(name);
    }
}

fn pick(choices: &[String], level: TaxonomyLevel, value: &str) -> SessionResult<String> {
    let wanted = value.trim();
    choices
        .iter()
        .find(|choice| choice.as_str() == wanted)
        .cloned()
        .ok_or_else(|| SessionError::NotAChoice {
            level,
            value: value.to_string(),
        })
}
