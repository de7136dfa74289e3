//! Section and attach handlers.
//!
//! ```text
//! POST /api/v1/sections {"title":"Fractions"}
//! GET  /api/v1/sections/{section_id}
//! GET  /api/v1/sections/{section_id}/exercises
//! POST /api/v1/sections/{section_id}/exercises {"title":"Halves","question":"...","answers":["1"]}
//! POST /api/v1/sections/{section_id}/reconcile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::{AttachExerciseRequest, ReconciliationReport};
use crate::domain::{Exercise, Section};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AttachedExerciseSchema, ErrorSchema, ExerciseSchema, ReconciliationReportSchema,
    SectionSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_section_id};

const SECTION_ID: FieldName = FieldName::new("sectionId");

/// Payload for creating a section.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSectionBody {
    #[schema(example = "Fractions")]
    pub title: String,
}

/// Payload for creating an exercise inside a section.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachExerciseBody {
    #[schema(example = "Halves")]
    pub title: String,
    #[schema(example = "What is 1/2 + 1/2?")]
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// Create an empty section.
#[utoipa::path(
    post,
    path = "/api/v1/sections",
    request_body = CreateSectionBody,
    responses(
        (status = 201, description = "Section created", body = SectionSchema),
        (status = 400, description = "Blank title", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "createSection"
)]
#[post("/sections")]
pub async fn create_section(
    state: web::Data<HttpState>,
    payload: web::Json<CreateSectionBody>,
) -> ApiResult<HttpResponse> {
    let section = state
        .sections
        .create_section(payload.into_inner().title)
        .await?;
    Ok(HttpResponse::Created().json(section))
}

/// Fetch a section and its component list.
#[utoipa::path(
    get,
    path = "/api/v1/sections/{section_id}",
    params(("section_id" = String, Path, description = "Section identifier")),
    responses(
        (status = 200, description = "Section", body = SectionSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown section", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "getSection"
)]
#[get("/sections/{section_id}")]
pub async fn get_section(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Section>> {
    let section_id = parse_section_id(&path.into_inner(), SECTION_ID)?;
    let section = state.curriculum.fetch_section(&section_id).await?;
    Ok(web::Json(section))
}

/// List the exercises a section references, in display order.
#[utoipa::path(
    get,
    path = "/api/v1/sections/{section_id}/exercises",
    params(("section_id" = String, Path, description = "Section identifier")),
    responses(
        (status = 200, description = "Exercises in component order", body = [ExerciseSchema]),
        (status = 404, description = "Unknown section", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "listSectionExercises"
)]
#[get("/sections/{section_id}/exercises")]
pub async fn list_section_exercises(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Exercise>>> {
    let section_id = parse_section_id(&path.into_inner(), SECTION_ID)?;
    let exercises = state.curriculum.list_section_exercises(&section_id).await?;
    Ok(web::Json(exercises))
}

/// Create an exercise and append it to the section's component list.
#[utoipa::path(
    post,
    path = "/api/v1/sections/{section_id}/exercises",
    params(("section_id" = String, Path, description = "Section identifier")),
    request_body = AttachExerciseBody,
    responses(
        (status = 201, description = "Exercise attached", body = AttachedExerciseSchema),
        (
            status = 400,
            description = "Invalid content, or the section is full (details.code E1101)",
            body = ErrorSchema
        ),
        (status = 404, description = "Unknown section", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "attachExercise"
)]
#[post("/sections/{section_id}/exercises")]
pub async fn attach_exercise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AttachExerciseBody>,
) -> ApiResult<HttpResponse> {
    let section_id = parse_section_id(&path.into_inner(), SECTION_ID)?;
    let AttachExerciseBody {
        title,
        question,
        answers,
    } = payload.into_inner();
    let attached = state
        .exercises
        .attach_exercise(AttachExerciseRequest {
            section_id,
            title,
            question,
            answers,
        })
        .await?;
    Ok(HttpResponse::Created().json(attached))
}

/// Repair drift between a section's component list and its exercises.
#[utoipa::path(
    post,
    path = "/api/v1/sections/{section_id}/reconcile",
    params(("section_id" = String, Path, description = "Section identifier")),
    responses(
        (status = 200, description = "Repairs performed", body = ReconciliationReportSchema),
        (status = 404, description = "Unknown section", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "reconcileSection"
)]
#[post("/sections/{section_id}/reconcile")]
pub async fn reconcile_section(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReconciliationReport>> {
    let section_id = parse_section_id(&path.into_inner(), SECTION_ID)?;
    let report = state.sections.reconcile_section(&section_id).await?;
    Ok(web::Json(report))
}

#[cfg(test)]
#[path = "sections_tests.rs"]
mod tests;
