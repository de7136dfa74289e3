//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler and the schema wrappers from
//! [`crate::inbound::http::schemas`]. The document is served by Swagger UI in
//! debug builds and printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::exercises::{DeleteExerciseResponse, UpdateExerciseBody};
use crate::inbound::http::schemas::{
    AttachedExerciseSchema, ComponentRefSchema, ConsistencyWarningSchema, ErrorCodeSchema,
    ErrorSchema, ExerciseSchema, ReconciliationReportSchema, SectionSchema, UserSchema,
};
use crate::inbound::http::sections::{AttachExerciseBody, CreateSectionBody};
use crate::inbound::http::users::{RegisterUserBody, UpdateUserBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StudyQuest backend API",
        description = "User leveling, sections and exercises with bounded component lists."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::sections::create_section,
        crate::inbound::http::sections::get_section,
        crate::inbound::http::sections::list_section_exercises,
        crate::inbound::http::sections::attach_exercise,
        crate::inbound::http::sections::reconcile_section,
        crate::inbound::http::exercises::get_exercise,
        crate::inbound::http::exercises::update_exercise,
        crate::inbound::http::exercises::delete_exercise,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        SectionSchema,
        ComponentRefSchema,
        ExerciseSchema,
        AttachedExerciseSchema,
        ConsistencyWarningSchema,
        ReconciliationReportSchema,
        RegisterUserBody,
        UpdateUserBody,
        CreateSectionBody,
        AttachExerciseBody,
        UpdateExerciseBody,
        DeleteExerciseResponse,
    )),
    tags(
        (name = "users", description = "Registration and leveling"),
        (name = "sections", description = "Sections and their component lists"),
        (name = "exercises", description = "Exercise content and removal"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
