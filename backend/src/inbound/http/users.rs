//! User registration and progress handlers.
//!
//! ```text
//! POST  /api/v1/users {"name":"Ada","email":"ada@example.com"}
//! GET   /api/v1/users/{user_id}
//! PATCH /api/v1/users/{user_id} {"points":120}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::{RegisterUserRequest, UpdateUserRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id, present_value};

/// Registration payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserBody {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Partial update payload.
///
/// `points` is an absolute running total. It must be a positive integer; the
/// service converts it into stored points and level.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present_value")]
    #[schema(value_type = Option<u64>, example = 120)]
    pub points: Option<Value>,
}

/// Register a user at level 1 with zero points.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = UserSchema),
        (status = 400, description = "Invalid name or email", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let RegisterUserBody { name, email } = payload.into_inner();
    let user = state
        .users
        .register_user(RegisterUserRequest { name, email })
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch a user with current points and level.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("userId"))?;
    let user = state.users_query.fetch_user(&user_id).await?;
    Ok(web::Json(user))
}

/// Update profile fields and, optionally, the points total.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (
            status = 400,
            description = "Invalid field; points failures carry E0601 or E0602 in details.code",
            body = ErrorSchema
        ),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<User>> {
    let user_id = parse_user_id(&path.into_inner(), FieldName::new("userId"))?;
    let UpdateUserBody {
        name,
        email,
        points,
    } = payload.into_inner();
    let user = state
        .users
        .update_user(UpdateUserRequest {
            user_id,
            name,
            email,
            points,
        })
        .await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{in_memory_state, json_body};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    fn test_app(
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
                .service(register_user)
                .service(get_user)
                .service(update_user),
        )
    }

    async fn register(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> String {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "name": "Ada", "email": "ada@example.com" }))
            .to_request();
        let res = actix_test::call_service(app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = json_body(res).await;
        assert_eq!(body["points"], 0);
        assert_eq!(body["level"], 1);
        body["id"].as_str().expect("id").to_owned()
    }

    async fn patch_points(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        id: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/users/{id}"))
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(app, req).await;
        let status = res.status();
        (status, json_body(res).await)
    }

    #[rstest]
    #[case(json!({ "points": 120 }), 20, 2)]
    #[case(json!({ "points": 100 }), 0, 2)]
    #[case(json!({ "points": 99 }), 99, 1)]
    #[case(json!({ "points": 1050 }), 50, 11)]
    #[actix_web::test]
    async fn points_total_sets_points_and_level(
        #[case] body: Value,
        #[case] points: u64,
        #[case] level: u64,
    ) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let id = register(&app).await;
        let (status, user) = patch_points(&app, &id, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["points"], points);
        assert_eq!(user["level"], level);
    }

    #[rstest]
    #[case(json!({ "points": 0 }), "E0601")]
    #[case(json!({ "points": -5 }), "E0601")]
    #[case(json!({ "points": "120" }), "E0602")]
    #[case(json!({ "points": 12.5 }), "E0602")]
    #[case(json!({ "points": null }), "E0602")]
    #[actix_web::test]
    async fn invalid_points_leave_user_untouched(#[case] body: Value, #[case] reason: &str) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let id = register(&app).await;
        let (status, error) = patch_points(&app, &id, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "invalid_request");
        assert_eq!(error["details"]["code"], reason);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{id}"))
            .to_request();
        let user = json_body(actix_test::call_service(&app, req).await).await;
        assert_eq!(user["points"], 0);
        assert_eq!(user["level"], 1);
    }

    #[rstest]
    #[case(json!({ "points": 0 }), "E0601")]
    #[case(json!({ "points": "ten" }), "E0602")]
    #[actix_web::test]
    async fn invalid_points_for_unknown_user_are_bad_requests(
        #[case] body: Value,
        #[case] reason: &str,
    ) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let unknown = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let (status, error) = patch_points(&app, unknown, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["details"]["code"], reason);
    }

    #[rstest]
    #[actix_web::test]
    async fn name_only_update_keeps_progress() {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let id = register(&app).await;
        patch_points(&app, &id, json!({ "points": 250 })).await;
        let (status, user) = patch_points(&app, &id, json!({ "name": "Ada L." })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["name"], "Ada L.");
        assert_eq!(user["points"], 50);
        assert_eq!(user["level"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        register(&app).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "name": "Imposter", "email": "ada@example.com" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[case("/api/v1/users/not-a-uuid", StatusCode::BAD_REQUEST)]
    #[case("/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn lookups_validate_and_report_missing(#[case] uri: &str, #[case] expected: StatusCode) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), expected);
    }
}
