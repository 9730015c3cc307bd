use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use serde_json::{Value, json};

use super::{ApiResult, SessionId};
use crate::{server::AppState, success, types::QueryParams, utils, warning};

pub async fn login(State(state): State<AppState>) -> Json<Value> {
    let login = state.sessions.begin_login().await;
    let code_challenge = utils::generate_code_challenge(&login.code_verifier);
    let url = state.spotify.authorize_url(&login.state, &code_challenge);

    Json(json!({ "url": url }))
}

pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Redirect {
    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        return Redirect::to("/#error=authorization_failed");
    }

    let Some(code) = params.get("code") else {
        return Redirect::to("/#error=authorization_failed");
    };

    let login = match params.get("state") {
        Some(s) => state.sessions.take_login(s).await,
        None => None,
    };
    let Some(login) = login else {
        return Redirect::to("/#error=state_mismatch");
    };

    match state.spotify.exchange_code(code, &login.code_verifier).await {
        Ok(token) => {
            let expires_in = token.expires_in;
            let session = state.sessions.create(token).await;
            success!("New session established.");
            Redirect::to(&format!("/?session={session}&expires_in={expires_in}"))
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Redirect::to("/#error=token_retrieval_failed")
        }
    }
}

pub async fn refresh_token(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> ApiResult<Json<Value>> {
    let token = state.sessions.refresh(&id, &state.spotify).await?;
    Ok(Json(json!({ "expires_in": token.expires_in })))
}

pub async fn logout(State(state): State<AppState>, SessionId(id): SessionId) -> StatusCode {
    state.sessions.remove(&id).await;
    StatusCode::NO_CONTENT
}
