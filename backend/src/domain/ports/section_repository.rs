//! Port abstraction for section persistence.
//!
//! The component list is only ever changed through [`SectionRepository::append_component`]
//! and [`SectionRepository::remove_component`]; both are single atomic
//! mutations so concurrent attaches cannot push a list past its bound.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ComponentRef, Section, SectionId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by section repository adapters.
    pub enum SectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "section repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "section repository query failed: {message}",
    }
}

/// Result of a bounded append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The component was appended; carries the stored section.
    Appended(Section),
    /// The list was already full; nothing changed.
    AtCapacity(Section),
    /// No section with that id exists.
    SectionMissing,
}

/// Result of removing a component by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry was removed; carries the stored section.
    Removed(Section),
    /// The section exists but did not list the component.
    NotListed(Section),
    /// No section with that id exists.
    SectionMissing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Fetch a section by identifier.
    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, SectionRepositoryError>;

    /// Persist a new section.
    async fn insert(&self, section: &Section) -> Result<(), SectionRepositoryError>;

    /// Append `component` only while the list holds fewer than `capacity`
    /// entries.
    async fn append_component(
        &self,
        id: &SectionId,
        component: &ComponentRef,
        capacity: usize,
    ) -> Result<AppendOutcome, SectionRepositoryError>;

    /// Remove the entry whose `compId` equals `comp_id`, keeping the order of
    /// the remaining entries.
    async fn remove_component(
        &self,
        id: &SectionId,
        comp_id: &Uuid,
    ) -> Result<RemoveOutcome, SectionRepositoryError>;
}
