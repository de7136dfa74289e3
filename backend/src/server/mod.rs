//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use studyquest::Trace;
#[cfg(debug_assertions)]
use studyquest::doc::ApiDoc;
use studyquest::inbound::http::exercises::{delete_exercise, get_exercise, update_exercise};
use studyquest::inbound::http::health::{HealthState, live, ready};
use studyquest::inbound::http::sections::{
    attach_exercise, create_section, get_section, list_section_exercises, reconcile_section,
};
use studyquest::inbound::http::state::HttpState;
use studyquest::inbound::http::users::{get_user, register_user, update_user};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(register_user)
        .service(get_user)
        .service(update_user)
        .service(create_section)
        .service(get_section)
        .service(list_section_exercises)
        .service(attach_exercise)
        .service(reconcile_section)
        .service(get_exercise)
        .service(update_exercise)
        .service(delete_exercise);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// The health state is marked ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
