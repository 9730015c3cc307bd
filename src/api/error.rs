use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::{
    management::SessionError,
    mood::MoodError,
    recommend::PlaylistError,
    spotify::SpotifyError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidMood(#[from] MoodError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// An upstream call failed; `context` says what the handler was doing.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: SpotifyError,
    },

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

impl ApiError {
    pub fn upstream(context: &'static str) -> impl FnOnce(SpotifyError) -> Self {
        move |source| ApiError::Upstream { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::InvalidMood(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.to_string() }),
            ),
            ApiError::Session(SessionError::Missing) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "No session provided" }),
            ),
            ApiError::Session(_) => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Token expired",
                    "message": "Your session has expired. Please reconnect to Spotify."
                }),
            ),
            ApiError::Upstream { context, source } => upstream_body(context, &source),
            ApiError::Playlist(err) => {
                let (status, mut body) = upstream_body(err.step.failure_message(), &err.source);
                body["step"] = json!(err.step);
                if let Some(id) = err.playlist_id {
                    body["playlistId"] = json!(id);
                }
                (status, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

fn upstream_body(context: &str, err: &SpotifyError) -> (StatusCode, Value) {
    match err {
        SpotifyError::RateLimited { retry_after } => (
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "error": "Rate limit exceeded",
                "retryAfter": retry_after,
                "message": format!("Too many requests. Please wait {retry_after} seconds."),
            }),
        ),
        SpotifyError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            json!({
                "error": "Token expired",
                "message": "Your session has expired. Please reconnect to Spotify."
            }),
        ),
        other => {
            let status = StatusCode::from_u16(other.status_code())
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                json!({ "error": context, "message": other.to_string() }),
            )
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
