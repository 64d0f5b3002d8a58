mod rejection;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use axum_macros::debug_handler;
use serde_json::json;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, DeleteNoteResponse, ErrorResponse, NoteResponse, UpdateNoteRequest,
        UserQuery,
    },
    service::{NoteService, NoteServiceError},
};

use rejection::ApiRejection;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_note,
        get_all_notes,
        get_one_note,
        update_note,
        delete_note,
        health_check,
        readiness
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Per-user notes management API"),
        (name = "system", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

fn error_response(e: NoteServiceError, action: &str) -> Response {
    let status = match &e {
        NoteServiceError::Validation { .. } | NoteServiceError::InvalidText { .. } => {
            StatusCode::BAD_REQUEST
        }
        NoteServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        NoteServiceError::Storage(err) => {
            tracing::error!("failed to {action}: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: "Internal server error".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!("failed to {action}: {e}");
    (
        status,
        Json(ErrorResponse {
            detail: e.to_string(),
        }),
    )
        .into_response()
}

fn user_id(query: &UserQuery) -> &str {
    query.user_id.as_deref().unwrap_or_default()
}

#[utoipa::path(
    post,
    path = "/notes",
    params(UserQuery),
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Malformed user_id", body = ErrorResponse),
        (status = 422, description = "Request body does not match the schema", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiRejection>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateNoteRequest>, ApiRejection>,
) -> Response {
    match service.create_note(user_id(&query), payload).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => error_response(e, "create note"),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    params(UserQuery),
    responses(
        (status = 200, description = "Notes owned by the user", body = Vec<NoteResponse>),
        (status = 400, description = "Malformed user_id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiRejection>,
) -> Response {
    match service.get_all_notes(user_id(&query)).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => error_response(e, "list notes"),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{note_id}",
    params(
        ("note_id" = String, Path, description = "Note ID (UUID)"),
        UserQuery
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 400, description = "Malformed note_id or user_id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    WithRejection(Path(note_id), _): WithRejection<Path<String>, ApiRejection>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiRejection>,
) -> Response {
    match service.get_one_note(&note_id, user_id(&query)).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => error_response(e, "get note"),
    }
}

#[utoipa::path(
    put,
    path = "/notes/{note_id}",
    params(
        ("note_id" = String, Path, description = "Note ID (UUID)"),
        UserQuery
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Malformed note_id or user_id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 422, description = "Request body does not match the schema", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    WithRejection(Path(note_id), _): WithRejection<Path<String>, ApiRejection>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiRejection>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateNoteRequest>, ApiRejection>,
) -> Response {
    match service.update_note(&note_id, user_id(&query), payload).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => error_response(e, "update note"),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{note_id}",
    params(
        ("note_id" = String, Path, description = "Note ID (UUID)"),
        UserQuery
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 400, description = "Malformed note_id or user_id", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    WithRejection(Path(note_id), _): WithRejection<Path<String>, ApiRejection>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiRejection>,
) -> Response {
    match service.delete_note(&note_id, user_id(&query)).await {
        Ok(()) => (StatusCode::OK, Json(DeleteNoteResponse { ok: true })).into_response(),
        Err(e) => error_response(e, "delete note"),
    }
}

pub async fn root() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": "Notes API is running" })),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is alive")),
    tag = "system"
)]
pub async fn health_check() -> Response {
    (StatusCode::OK, Json(json!({ "status": "healthy" }))).into_response()
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "system"
)]
#[debug_handler]
pub async fn readiness(State(service): State<Arc<NoteService>>) -> Response {
    if service.is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
            .into_response()
    }
}
