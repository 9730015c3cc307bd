use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{ApiError, ApiResult, AuthSession};
use crate::{
    server::AppState,
    types::{Library, RawAudioFeatures, SavedAlbum},
    utils,
};

pub async fn albums(
    State(state): State<AppState>,
    session: AuthSession,
) -> ApiResult<Json<Library<SavedAlbum>>> {
    let library = state
        .spotify
        .saved_albums(&session.access_token, state.settings.ranking.library_max_pages)
        .await
        .map_err(ApiError::upstream("Failed to fetch albums"))?;

    Ok(Json(library))
}

#[derive(Debug, Deserialize)]
pub struct AudioFeaturesQuery {
    track_ids: Option<String>,
}

pub async fn audio_features(
    State(state): State<AppState>,
    session: AuthSession,
    Query(query): Query<AudioFeaturesQuery>,
) -> ApiResult<Json<Vec<Option<RawAudioFeatures>>>> {
    let ids = query
        .track_ids
        .as_deref()
        .map(utils::split_ids)
        .unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::BadRequest("Missing track_ids parameter".to_string()));
    }

    let features = state
        .spotify
        .raw_audio_features(&session.access_token, &ids)
        .await
        .map_err(ApiError::upstream("Failed to fetch audio features"))?;

    Ok(Json(features))
}
