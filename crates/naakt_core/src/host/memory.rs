//! In-memory host document.
//!
//! # Responsibility
//! - Provide a deterministic `HostDocument` for tests and the CLI probe.
//! - Emulate host transaction semantics with snapshot rollback.
//! - Allow fault injection to exercise rollback paths.
//!
//! # Invariants
//! - Enumeration order equals insertion order.
//! - Rolling back restores the exact state captured at `begin_transaction`.

use super::{
    ElementId, FillPattern, HostDocument, HostError, HostMaterial, HostResult, PatternElement,
};
use crate::model::presentation::{ColorSlot, HexColor};

/// Failure to inject into the next matching host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    DuplicateMaterial,
    DuplicateAsset,
    SetAppearanceAsset,
    SetPattern,
    SetPatternColor,
}

/// Stored pattern/color state of one material slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub pattern: Option<ElementId>,
    pub color: Option<HexColor>,
}

/// Material record held by [`InMemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMaterial {
    pub id: ElementId,
    pub name: String,
    pub appearance_asset: Option<ElementId>,
    slots: [SlotState; 4],
}

impl MemoryMaterial {
    pub fn slot(&self, slot: ColorSlot) -> SlotState {
        self.slots[slot.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryAsset {
    id: ElementId,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryPattern {
    id: ElementId,
    name: String,
    /// `None` models a pattern element whose definition cannot be read.
    definition: Option<FillPattern>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DocumentState {
    materials: Vec<MemoryMaterial>,
    assets: Vec<MemoryAsset>,
    patterns: Vec<MemoryPattern>,
    next_id: i64,
}

impl DocumentState {
    fn allocate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }
}

/// Host document kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    state: DocumentState,
    open_transaction: Option<(String, DocumentState)>,
    faults: Vec<Fault>,
    committed: Vec<String>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material without an appearance asset.
    pub fn add_material(&mut self, name: &str) -> ElementId {
        let id = self.state.allocate_id();
        self.state.materials.push(MemoryMaterial {
            id,
            name: name.to_string(),
            appearance_asset: None,
            slots: [SlotState::default(); 4],
        });
        id
    }

    /// Adds a material with an attached appearance asset.
    pub fn add_material_with_asset(&mut self, name: &str, asset_name: &str) -> ElementId {
        let asset = self.state.allocate_id();
        self.state.assets.push(MemoryAsset {
            id: asset,
            name: asset_name.to_string(),
        });
        let id = self.add_material(name);
        if let Some(material) = self.state.materials.iter_mut().find(|m| m.id == id) {
            material.appearance_asset = Some(asset);
        }
        id
    }

    pub fn add_fill_pattern(&mut self, name: &str, is_solid: bool) -> ElementId {
        self.push_pattern(name, Some(FillPattern { is_solid }))
    }

    /// Adds a pattern element whose definition fails to read.
    pub fn add_unreadable_pattern(&mut self, name: &str) -> ElementId {
        self.push_pattern(name, None)
    }

    /// Makes the next call of the given kind fail.
    pub fn inject_fault(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn material_count(&self) -> usize {
        self.state.materials.len()
    }

    pub fn asset_count(&self) -> usize {
        self.state.assets.len()
    }

    pub fn material(&self, id: ElementId) -> Option<&MemoryMaterial> {
        self.state.materials.iter().find(|material| material.id == id)
    }

    pub fn material_by_name(&self, name: &str) -> Option<&MemoryMaterial> {
        self.state.materials.iter().find(|material| material.name == name)
    }

    pub fn asset_name(&self, id: ElementId) -> Option<&str> {
        self.state
            .assets
            .iter()
            .find(|asset| asset.id == id)
            .map(|asset| asset.name.as_str())
    }

    /// Labels of committed transactions, oldest first.
    pub fn committed_transactions(&self) -> &[String] {
        &self.committed
    }

    pub fn in_transaction(&self) -> bool {
        self.open_transaction.is_some()
    }

    fn push_pattern(&mut self, name: &str, definition: Option<FillPattern>) -> ElementId {
        let id = self.state.allocate_id();
        self.state.patterns.push(MemoryPattern {
            id,
            name: name.to_string(),
            definition,
        });
        id
    }

    fn take_fault(&mut self, fault: Fault) -> bool {
        match self.faults.iter().position(|pending| *pending == fault) {
            Some(index) => {
                self.faults.remove(index);
                true
            }
            None => false,
        }
    }

    fn require_transaction(&self) -> HostResult<()> {
        if self.open_transaction.is_some() {
            Ok(())
        } else {
            Err(HostError::NoTransaction)
        }
    }

    fn material_mut(&mut self, id: ElementId) -> HostResult<&mut MemoryMaterial> {
        self.state
            .materials
            .iter_mut()
            .find(|material| material.id == id)
            .ok_or(HostError::ElementNotFound(id))
    }
}

impl HostDocument for InMemoryDocument {
    fn materials(&self) -> HostResult<Vec<HostMaterial>> {
        Ok(self
            .state
            .materials
            .iter()
            .map(|material| HostMaterial {
                id: material.id,
                name: material.name.clone(),
                appearance_asset: material.appearance_asset,
            })
            .collect())
    }

    fn pattern_elements(&self) -> HostResult<Vec<PatternElement>> {
        Ok(self
            .state
            .patterns
            .iter()
            .map(|pattern| PatternElement {
                id: pattern.id,
                name: pattern.name.clone(),
            })
            .collect())
    }

    fn fill_pattern(&self, id: ElementId) -> HostResult<FillPattern> {
        let pattern = self
            .state
            .patterns
            .iter()
            .find(|pattern| pattern.id == id)
            .ok_or(HostError::ElementNotFound(id))?;
        pattern.definition.ok_or_else(|| {
            HostError::Operation(format!("fill pattern `{}` has no definition", pattern.name))
        })
    }

    fn duplicate_material(&mut self, source: ElementId, new_name: &str) -> HostResult<ElementId> {
        self.require_transaction()?;
        if self.take_fault(Fault::DuplicateMaterial) {
            return Err(HostError::Operation("material duplication failed".to_string()));
        }
        if self.state.materials.iter().any(|m| m.name == new_name) {
            return Err(HostError::DuplicateName(new_name.to_string()));
        }
        let template = self
            .state
            .materials
            .iter()
            .find(|material| material.id == source)
            .cloned()
            .ok_or(HostError::ElementNotFound(source))?;
        let id = self.state.allocate_id();
        self.state.materials.push(MemoryMaterial {
            id,
            name: new_name.to_string(),
            ..template
        });
        Ok(id)
    }

    fn duplicate_appearance_asset(
        &mut self,
        asset: ElementId,
        new_name: &str,
    ) -> HostResult<ElementId> {
        self.require_transaction()?;
        if self.take_fault(Fault::DuplicateAsset) {
            return Err(HostError::Operation("asset duplication failed".to_string()));
        }
        if !self.state.assets.iter().any(|existing| existing.id == asset) {
            return Err(HostError::ElementNotFound(asset));
        }
        if self.state.assets.iter().any(|existing| existing.name == new_name) {
            return Err(HostError::DuplicateName(new_name.to_string()));
        }
        let id = self.state.allocate_id();
        self.state.assets.push(MemoryAsset {
            id,
            name: new_name.to_string(),
        });
        Ok(id)
    }

    fn set_appearance_asset(&mut self, material: ElementId, asset: ElementId) -> HostResult<()> {
        self.require_transaction()?;
        if self.take_fault(Fault::SetAppearanceAsset) {
            return Err(HostError::Operation("asset assignment failed".to_string()));
        }
        if !self.state.assets.iter().any(|existing| existing.id == asset) {
            return Err(HostError::ElementNotFound(asset));
        }
        self.material_mut(material)?.appearance_asset = Some(asset);
        Ok(())
    }

    fn set_pattern(
        &mut self,
        material: ElementId,
        slot: ColorSlot,
        pattern: ElementId,
    ) -> HostResult<()> {
        self.require_transaction()?;
        if self.take_fault(Fault::SetPattern) {
            return Err(HostError::Operation(format!("cannot assign pattern to {slot}")));
        }
        if !self.state.patterns.iter().any(|existing| existing.id == pattern) {
            return Err(HostError::ElementNotFound(pattern));
        }
        self.material_mut(material)?.slots[slot.index()].pattern = Some(pattern);
        Ok(())
    }

    fn set_pattern_color(
        &mut self,
        material: ElementId,
        slot: ColorSlot,
        color: HexColor,
    ) -> HostResult<()> {
        self.require_transaction()?;
        if self.take_fault(Fault::SetPatternColor) {
            return Err(HostError::Operation(format!("cannot assign color to {slot}")));
        }
        self.material_mut(material)?.slots[slot.index()].color = Some(color);
        Ok(())
    }

    fn begin_transaction(&mut self, label: &str) -> HostResult<()> {
        if self.open_transaction.is_some() {
            return Err(HostError::TransactionAlreadyOpen);
        }
        self.open_transaction = Some((label.to_string(), self.state.clone()));
        Ok(())
    }

    fn commit_transaction(&mut self) -> HostResult<()> {
        let (label, _) = self.open_transaction.take().ok_or(HostError::NoTransaction)?;
        self.committed.push(label);
        Ok(())
    }

    fn rollback_transaction(&mut self) -> HostResult<()> {
        let (_, snapshot) = self.open_transaction.take().ok_or(HostError::NoTransaction)?;
        self.state = snapshot;
        Ok(())
    }
}
