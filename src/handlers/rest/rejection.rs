use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};

use crate::dto::ErrorResponse;

/// Extractor failures rendered in the same `{"detail": ...}` shape as
/// service errors. The status stays whatever axum chose for the rejection.
#[derive(Debug, thiserror::Error)]
pub enum ApiRejection {
    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Path(r) => (r.status(), r.body_text()),
            Self::Query(r) => (r.status(), r.body_text()),
            Self::Json(r) => (r.status(), r.body_text()),
        };

        tracing::debug!("request rejected: {detail}");
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
