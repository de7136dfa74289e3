//! Content sections and their ordered component lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::ids::{ExerciseId, SectionId};

/// Upper bound on components held by one section.
pub const MAX_COMPONENTS: usize = 10;

/// Kind of entity a component reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// An [`Exercise`](super::Exercise).
    Exercise,
}

impl ComponentType {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
        }
    }
}

/// Reference stored inside a section's component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    comp_id: Uuid,
    comp_type: ComponentType,
}

impl ComponentRef {
    /// Reference to an exercise.
    pub fn exercise(id: &ExerciseId) -> Self {
        Self {
            comp_id: *id.as_uuid(),
            comp_type: ComponentType::Exercise,
        }
    }

    /// Identifier of the referenced entity.
    pub fn comp_id(&self) -> Uuid {
        self.comp_id
    }

    /// Kind of the referenced entity.
    pub fn comp_type(&self) -> ComponentType {
        self.comp_type
    }

    /// True when this entry points at `exercise`.
    pub fn refers_to(&self, exercise: &ExerciseId) -> bool {
        self.comp_type == ComponentType::Exercise && self.comp_id == *exercise.as_uuid()
    }
}

/// Violations of the component list invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentListError {
    /// The list already holds [`MAX_COMPONENTS`] entries.
    #[error("section already holds {MAX_COMPONENTS} components")]
    AtCapacity,
    /// The component id is already listed.
    #[error("component {comp_id} is already listed")]
    Duplicate { comp_id: Uuid },
}

/// A content section.
///
/// ## Invariants
/// - `components.len() <= MAX_COMPONENTS`
/// - each `comp_id` appears at most once; order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    id: SectionId,
    title: String,
    components: Vec<ComponentRef>,
}

impl Section {
    /// New section with no components.
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            components: Vec::new(),
        }
    }

    /// Rebuild a section from stored parts, re-checking list invariants.
    pub fn try_from_parts(
        id: SectionId,
        title: impl Into<String>,
        components: Vec<ComponentRef>,
    ) -> Result<Self, ComponentListError> {
        let mut section = Self::new(id, title);
        for component in components {
            section.push_component(component)?;
        }
        Ok(section)
    }

    /// Stable identifier.
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Components in display order.
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// True while another component can be appended.
    pub fn has_capacity(&self) -> bool {
        self.components.len() < MAX_COMPONENTS
    }

    /// True when `exercise` is listed.
    pub fn lists(&self, exercise: &ExerciseId) -> bool {
        self.components.iter().any(|c| c.refers_to(exercise))
    }

    /// Append a component at the end of the list.
    pub fn push_component(&mut self, component: ComponentRef) -> Result<(), ComponentListError> {
        if self
            .components
            .iter()
            .any(|c| c.comp_id() == component.comp_id())
        {
            return Err(ComponentListError::Duplicate {
                comp_id: component.comp_id(),
            });
        }
        if !self.has_capacity() {
            return Err(ComponentListError::AtCapacity);
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove the entry for `comp_id`, keeping the order of the rest.
    ///
    /// Returns `false` when nothing was listed under that id.
    pub fn remove_component(&mut self, comp_id: Uuid) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.comp_id() != comp_id);
        self.components.len() != before
    }
}
