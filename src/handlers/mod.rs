pub mod rest;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::service::NoteService;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/notes", post(rest::create_note).get(rest::get_all_notes))
        .route("/notes/", post(rest::create_note).get(rest::get_all_notes))
        .route(
            "/notes/{note_id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()),
        )
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}
