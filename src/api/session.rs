use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use super::ApiError;
use crate::{management::SessionError, server::AppState};

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Deserialize)]
struct SessionQuery {
    session: Option<String>,
}

/// A usable access token for the caller's session.
///
/// The session id comes from the `X-Session-Id` header or the `session`
/// query parameter. Extraction refreshes the token when it is about to expire.
pub struct AuthSession {
    pub access_token: String,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = session_id(parts).ok_or(SessionError::Missing)?;
        let access_token = state.sessions.access_token(&id, &state.spotify).await?;
        Ok(Self { access_token })
    }
}

/// Just the session id, for routes that must work even when the token is dead.
pub struct SessionId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session_id(parts) {
            Some(id) => Ok(SessionId(id)),
            None => Err(SessionError::Missing.into()),
        }
    }
}

/// The session id a request carries, without validating it.
pub fn session_id(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    from_header
        .or_else(|| {
            Query::<SessionQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|q| q.0.session)
        })
        .filter(|id| !id.is_empty())
}
