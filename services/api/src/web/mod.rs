pub mod note_task;
pub mod rest;
pub mod state;

use crate::web::rest::ApiDoc;
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use rest::{create_note_handler, health_handler, list_notes_handler};

const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

/// Builds the complete application: notes routes (also under `/api`),
/// health check and Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(app_state.config.cors_origin.as_deref());

    let notes_routes = Router::new()
        .route("/", get(health_handler))
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route("/api/notes", get(list_notes_handler).post(create_note_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(notes_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]),
        Err(e) => {
            warn!("Ignoring invalid CORS_ORIGIN '{}': {}", origin, e);
            CorsLayer::permissive()
        }
    }
}
