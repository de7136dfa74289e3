//! Driving port for section lifecycle and repair.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Error, ExerciseId, Section, SectionId};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Component ids dropped because no matching exercise exists.
    pub removed_references: Vec<Uuid>,
    /// Unlisted exercises deleted after the grace period.
    pub deleted_orphans: Vec<ExerciseId>,
    /// Unlisted exercises left alone because they are too recent.
    pub pending_orphans: Vec<ExerciseId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionCommand: Send + Sync {
    /// Create an empty section.
    async fn create_section(&self, title: String) -> Result<Section, Error>;

    /// Repair drift between a section's component list and its exercises.
    async fn reconcile_section(&self, section_id: &SectionId)
    -> Result<ReconciliationReport, Error>;
}
