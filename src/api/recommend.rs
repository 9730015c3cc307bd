use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, ApiResult, AuthSession};
use crate::{
    mood::Mood,
    recommend::{self, PlaylistOutcome, PlaylistRequest},
    server::AppState,
    success,
    types::{AlbumRecommendations, LikedSongs},
};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    mood: Option<String>,
}

pub async fn recommend_albums(
    State(state): State<AppState>,
    session: AuthSession,
    Query(query): Query<RecommendQuery>,
) -> ApiResult<Json<AlbumRecommendations>> {
    let mood: Mood = query
        .mood
        .ok_or_else(|| ApiError::BadRequest("Missing mood parameter".to_string()))?
        .parse()?;

    let recommendations = recommend::recommend_albums(
        &state.spotify,
        &session.access_token,
        mood,
        &state.settings.ranking,
    )
    .await
    .map_err(ApiError::upstream("Failed to fetch albums"))?;

    Ok(Json(recommendations))
}

#[derive(Debug, Deserialize)]
pub struct LikedSongsQuery {
    mood: Option<String>,
    limit: Option<String>,
}

pub async fn liked_songs(
    State(state): State<AppState>,
    session: AuthSession,
    Query(query): Query<LikedSongsQuery>,
) -> ApiResult<Json<LikedSongs>> {
    let mood = query.mood.as_deref().map(str::parse::<Mood>).transpose()?;
    // an unparsable or zero limit falls back to the default, like a missing one
    let limit = query
        .limit
        .and_then(|l| l.trim().parse::<usize>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(state.settings.ranking.track_limit);

    let songs = recommend::liked_songs(
        &state.spotify,
        &session.access_token,
        mood,
        limit,
        &state.settings.ranking,
    )
    .await
    .map_err(ApiError::upstream("Failed to fetch liked songs"))?;

    Ok(Json(songs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistBody {
    mood: Option<String>,
    playlist_name: Option<String>,
    track_count: Option<Value>,
}

pub async fn create_playlist(
    State(state): State<AppState>,
    session: AuthSession,
    Json(body): Json<CreatePlaylistBody>,
) -> ApiResult<Json<Value>> {
    let (Some(mood), Some(name)) = (
        body.mood,
        body.playlist_name.filter(|n| !n.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing required parameters: mood, playlistName".to_string(),
        ));
    };
    let mood: Mood = mood.parse()?;

    let request = PlaylistRequest {
        mood,
        name,
        track_count: track_count(body.track_count.as_ref())
            .unwrap_or(state.settings.ranking.playlist_track_count),
    };

    let outcome = recommend::create_mood_playlist(
        &state.spotify,
        &session.access_token,
        &request,
        &state.settings.ranking,
    )
    .await?;

    match outcome {
        PlaylistOutcome::NoMatchingTracks => Ok(Json(json!({
            "success": false,
            "message": format!("No liked songs found matching {mood} mood. Try a different mood!"),
        }))),
        PlaylistOutcome::Created(playlist) => {
            success!(
                "Created playlist {} with {} tracks",
                playlist.name,
                playlist.tracks_added
            );
            Ok(Json(json!({
                "success": true,
                "message": format!(
                    "Successfully created playlist \"{}\" with {} tracks!",
                    request.name, playlist.tracks_added
                ),
                "playlist": playlist,
            })))
        }
    }
}

/// Accepts the track count as a number or a numeric string; anything else,
/// including zero, means "use the default".
fn track_count(value: Option<&Value>) -> Option<usize> {
    let count = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    usize::try_from(count).ok().filter(|c| *c > 0)
}
