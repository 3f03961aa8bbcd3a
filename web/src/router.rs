use crate::{
    controller::health_check_controller, middleware::auth::require_auth, sse_endpoint, AppState,
};
use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use log::*;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::controller::{
    announcement_controller, campus_event_controller, timetable_entry_controller, user_controller,
    user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Noticeboard API"
        ),
        paths(
            announcement_controller::create,
            announcement_controller::index,
            announcement_controller::read,
            announcement_controller::update,
            announcement_controller::delete,
            campus_event_controller::create,
            campus_event_controller::index,
            campus_event_controller::read,
            campus_event_controller::update,
            campus_event_controller::delete,
            timetable_entry_controller::create,
            timetable_entry_controller::index,
            timetable_entry_controller::update,
            timetable_entry_controller::delete,
            user_controller::create,
            user_session_controller::login,
            user_session_controller::logout,
            user_session_controller::me,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::announcements::Model,
                domain::announcements::Priority,
                domain::campus_events::Model,
                domain::timetable_entries::Model,
                domain::timetable_entries::DayOfWeek,
                domain::users::Model,
                domain::users::Role,
                domain::user::Credentials,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "noticeboard", description = "Departmental Noticeboard API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    let cors_layer = cors_layer(&app_state);

    Router::new()
        .merge(announcement_routes(app_state.clone()))
        .merge(campus_event_routes(app_state.clone()))
        .merge(timetable_entry_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(sse_routes(app_state))
        .merge(health_routes())
        .merge(api_docs_routes())
        .fallback_service(static_routes())
        .layer(cors_layer)
}

fn announcement_routes(app_state: AppState) -> Router {
    Router::new()
        // Mutations first so the auth gate applies to them only; the reads
        // added below stay public.
        .route("/announcements", post(announcement_controller::create))
        .route("/announcements/:id", put(announcement_controller::update))
        .route(
            "/announcements/:id",
            delete(announcement_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .route("/announcements", get(announcement_controller::index))
        .route("/announcements/:id", get(announcement_controller::read))
        .with_state(app_state)
}

fn campus_event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", post(campus_event_controller::create))
        .route("/events/:id", put(campus_event_controller::update))
        .route("/events/:id", delete(campus_event_controller::delete))
        .route_layer(from_fn(require_auth))
        .route("/events", get(campus_event_controller::index))
        .route("/events/:id", get(campus_event_controller::read))
        .with_state(app_state)
}

fn timetable_entry_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/timetable_entries",
            post(timetable_entry_controller::create),
        )
        .route(
            "/timetable_entries/:id",
            put(timetable_entry_controller::update),
        )
        .route(
            "/timetable_entries/:id",
            delete(timetable_entry_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .route("/timetable_entries", get(timetable_entry_controller::index))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users", post(user_controller::create))
        .with_state(app_state)
}

fn user_session_routes() -> Router {
    Router::new()
        .route("/login", post(user_session_controller::login))
        .route("/logout", delete(user_session_controller::logout))
        // The extractor rejects with 401 on its own, no auth gate needed here
        .route("/me", get(user_session_controller::me))
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sse", get(sse_endpoint::handler::sse_handler))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn api_docs_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

fn static_routes() -> ServeDir {
    ServeDir::new("./public")
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .service
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}
