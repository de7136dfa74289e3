//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`. The wrappers below mirror their
//! serialised shape and register under the domain type names so handlers can
//! return domain values directly.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or violates a domain rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// `details.code` carries reason codes such as `E0601` or `E1101`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "section already holds 10 components")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    /// Points towards the next level, always below 100.
    #[schema(example = 20)]
    points: u64,
    /// Current level, starting at 1.
    #[schema(example = 2)]
    level: u64,
}

/// OpenAPI schema for [`crate::domain::ComponentRef`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ComponentRef, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ComponentRefSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    comp_id: String,
    #[schema(example = "exercise")]
    comp_type: String,
}

/// OpenAPI schema for [`crate::domain::Section`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Section)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SectionSchema {
    id: String,
    #[schema(example = "Fractions")]
    title: String,
    /// At most ten entries, in display order.
    #[schema(max_items = 10)]
    components: Vec<ComponentRefSchema>,
}

/// OpenAPI schema for [`crate::domain::Exercise`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Exercise, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ExerciseSchema {
    id: String,
    parent_section: String,
    #[schema(example = "Halves")]
    title: String,
    #[schema(example = "What is 1/2 + 1/2?")]
    question: String,
    answers: Vec<String>,
    #[schema(format = DateTime)]
    date_created: String,
    #[schema(format = DateTime)]
    date_updated: String,
}

/// OpenAPI schema for [`crate::domain::ports::AttachedExercise`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::AttachedExercise)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AttachedExerciseSchema {
    exercise: ExerciseSchema,
    section: SectionSchema,
}

/// OpenAPI schema for [`crate::domain::ports::ConsistencyWarning`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ConsistencyWarning, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ConsistencyWarningSchema {
    #[schema(example = "E1104")]
    code: String,
    message: String,
    section_id: String,
}

/// OpenAPI schema for [`crate::domain::ports::ReconciliationReport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ReconciliationReport, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReconciliationReportSchema {
    /// Component ids dropped because no exercise backs them.
    removed_references: Vec<String>,
    /// Unlisted exercises deleted after the grace period.
    deleted_orphans: Vec<String>,
    /// Unlisted exercises still inside the grace period.
    pending_orphans: Vec<String>,
}
