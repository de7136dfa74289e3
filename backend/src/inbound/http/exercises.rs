//! Exercise read, edit and delete handlers.
//!
//! ```text
//! GET    /api/v1/exercises/{exercise_id}
//! PATCH  /api/v1/exercises/{exercise_id} {"title":"..."}
//! DELETE /api/v1/exercises/{exercise_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Exercise;
use crate::domain::ports::{ConsistencyWarning, DetachOutcome, UpdateExerciseRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ConsistencyWarningSchema, ErrorSchema, ExerciseSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_exercise_id};

const EXERCISE_ID: FieldName = FieldName::new("exerciseId");

/// Content changes; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateExerciseBody {
    pub title: Option<String>,
    pub question: Option<String>,
    pub answers: Option<Vec<String>>,
}

/// Result of a delete that removed an exercise.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteExerciseResponse {
    pub deleted: bool,
    /// Present when the owning section had drifted (code `E1104`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<ConsistencyWarningSchema>)]
    pub warning: Option<ConsistencyWarning>,
}

/// Fetch one exercise.
#[utoipa::path(
    get,
    path = "/api/v1/exercises/{exercise_id}",
    params(("exercise_id" = String, Path, description = "Exercise identifier")),
    responses(
        (status = 200, description = "Exercise", body = ExerciseSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown exercise", body = ErrorSchema)
    ),
    tags = ["exercises"],
    operation_id = "getExercise"
)]
#[get("/exercises/{exercise_id}")]
pub async fn get_exercise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Exercise>> {
    let exercise_id = parse_exercise_id(&path.into_inner(), EXERCISE_ID)?;
    let exercise = state.curriculum.fetch_exercise(&exercise_id).await?;
    Ok(web::Json(exercise))
}

/// Edit exercise content. The parent section never changes.
#[utoipa::path(
    patch,
    path = "/api/v1/exercises/{exercise_id}",
    params(("exercise_id" = String, Path, description = "Exercise identifier")),
    request_body = UpdateExerciseBody,
    responses(
        (status = 200, description = "Updated exercise", body = ExerciseSchema),
        (status = 400, description = "Blank title or question", body = ErrorSchema),
        (status = 404, description = "Unknown exercise", body = ErrorSchema)
    ),
    tags = ["exercises"],
    operation_id = "updateExercise"
)]
#[patch("/exercises/{exercise_id}")]
pub async fn update_exercise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateExerciseBody>,
) -> ApiResult<web::Json<Exercise>> {
    let exercise_id = parse_exercise_id(&path.into_inner(), EXERCISE_ID)?;
    let UpdateExerciseBody {
        title,
        question,
        answers,
    } = payload.into_inner();
    let exercise = state
        .exercises
        .update_exercise(
            &exercise_id,
            UpdateExerciseRequest {
                title,
                question,
                answers,
            },
        )
        .await?;
    Ok(web::Json(exercise))
}

/// Remove an exercise and its section reference.
///
/// Deleting an exercise that no longer exists succeeds with `204`.
#[utoipa::path(
    delete,
    path = "/api/v1/exercises/{exercise_id}",
    params(("exercise_id" = String, Path, description = "Exercise identifier")),
    responses(
        (status = 200, description = "Exercise deleted", body = DeleteExerciseResponse),
        (status = 204, description = "Exercise was already absent"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema)
    ),
    tags = ["exercises"],
    operation_id = "deleteExercise"
)]
#[delete("/exercises/{exercise_id}")]
pub async fn delete_exercise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let exercise_id = parse_exercise_id(&path.into_inner(), EXERCISE_ID)?;
    let warning = match state.exercises.detach_exercise(&exercise_id).await? {
        DetachOutcome::AlreadyAbsent => return Ok(HttpResponse::NoContent().finish()),
        DetachOutcome::Detached => None,
        DetachOutcome::DetachedWithWarning(warning) => Some(warning),
    };
    Ok(HttpResponse::Ok().json(DeleteExerciseResponse {
        deleted: true,
        warning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockExerciseCommand;
    use crate::domain::{ExerciseId, ReasonCode, SectionId};
    use crate::inbound::http::test_utils::{in_memory_state, json_body};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn app_with(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(get_exercise)
                .service(update_exercise)
                .service(delete_exercise),
        )
    }

    fn state_with_detach(outcome: DetachOutcome) -> HttpState {
        let mut command = MockExerciseCommand::new();
        command
            .expect_detach_exercise()
            .times(1)
            .return_once(move |_| Ok(outcome));
        HttpState {
            exercises: Arc::new(command),
            ..in_memory_state()
        }
    }

    async fn send_delete(state: HttpState) -> (StatusCode, serde_json::Value) {
        let app = actix_test::init_service(app_with(state)).await;
        let uri = format!("/api/v1/exercises/{}", ExerciseId::random());
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(&uri).to_request(),
        )
        .await;
        let status = res.status();
        (status, json_body(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_of_absent_exercise_is_no_content() {
        let (status, body) = send_delete(state_with_detach(DetachOutcome::AlreadyAbsent)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
    }

    #[rstest]
    #[actix_web::test]
    async fn clean_delete_has_no_warning() {
        let (status, body) = send_delete(state_with_detach(DetachOutcome::Detached)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "deleted": true }));
    }

    #[rstest]
    #[actix_web::test]
    async fn drift_is_reported_alongside_the_delete() {
        let section_id = SectionId::random();
        let warning = ConsistencyWarning::section_missing(section_id);
        let (status, body) =
            send_delete(state_with_detach(DetachOutcome::DetachedWithWarning(warning))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);
        assert_eq!(body["warning"]["code"], ReasonCode::DetachDrift.as_str());
        assert_eq!(body["warning"]["sectionId"], section_id.to_string());
    }

    #[rstest]
    #[case("/api/v1/exercises/42", StatusCode::BAD_REQUEST)]
    #[case("/api/v1/exercises/3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn fetch_validates_and_reports_missing(#[case] uri: &str, #[case] expected: StatusCode) {
        let app = actix_test::init_service(app_with(in_memory_state())).await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), expected);
        let body = json_body(res).await;
        if expected == StatusCode::BAD_REQUEST {
            assert_eq!(body["details"]["field"], "exerciseId");
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn patch_of_missing_exercise_is_not_found() {
        let app = actix_test::init_service(app_with(in_memory_state())).await;
        let uri = format!("/api/v1/exercises/{}", ExerciseId::random());
        let req = actix_test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "title": "Renamed" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
