use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::tracks::score_tracks;
use crate::{
    config::Ranking,
    mood::{Mood, rank_and_filter},
    spotify::{SpotifyClient, SpotifyError},
    types::{CreatePlaylistRequest, CreatedPlaylist},
};

/// The steps of building a mood playlist, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistStep {
    FetchProfile,
    FetchLikedSongs,
    CreatePlaylist,
    AddTracks,
}

impl PlaylistStep {
    pub fn failure_message(self) -> &'static str {
        match self {
            PlaylistStep::FetchProfile => "Failed to fetch user profile",
            PlaylistStep::FetchLikedSongs => "Failed to fetch liked songs",
            PlaylistStep::CreatePlaylist => "Failed to create playlist",
            PlaylistStep::AddTracks => "Playlist created but failed to add tracks",
        }
    }
}

impl fmt::Display for PlaylistStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaylistStep::FetchProfile => "fetch profile",
            PlaylistStep::FetchLikedSongs => "fetch liked songs",
            PlaylistStep::CreatePlaylist => "create playlist",
            PlaylistStep::AddTracks => "add tracks",
        })
    }
}

/// A failed step, with the playlist id when the playlist already exists.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct PlaylistError {
    pub step: PlaylistStep,
    pub playlist_id: Option<String>,
    #[source]
    pub source: SpotifyError,
}

impl PlaylistError {
    fn at(step: PlaylistStep) -> impl FnOnce(SpotifyError) -> Self {
        move |source| Self {
            step,
            playlist_id: None,
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    pub mood: Mood,
    pub name: String,
    pub track_count: usize,
}

#[derive(Debug, Clone)]
pub enum PlaylistOutcome {
    Created(CreatedPlaylist),
    /// No liked song scored above the track threshold; nothing was created.
    NoMatchingTracks,
}

/// Builds a private playlist from the liked songs that best match a mood.
///
/// Runs profile lookup, liked song ranking, playlist creation and track
/// insertion in that order and stops at the first failure. The returned error
/// names the failed step; if the playlist was already created its id is
/// included so the caller can tell the user where it is.
pub async fn create_mood_playlist(
    client: &SpotifyClient,
    token: &str,
    request: &PlaylistRequest,
    ranking: &Ranking,
) -> Result<PlaylistOutcome, PlaylistError> {
    let user = client
        .current_user(token)
        .await
        .map_err(PlaylistError::at(PlaylistStep::FetchProfile))?;

    let library = client
        .saved_tracks(token, ranking.library_max_pages)
        .await
        .map_err(PlaylistError::at(PlaylistStep::FetchLikedSongs))?;
    let scored = score_tracks(client, token, library.items, Some(request.mood))
        .await
        .map_err(PlaylistError::at(PlaylistStep::FetchLikedSongs))?;

    let tracks = rank_and_filter(scored, ranking.track_min_score, request.track_count);
    if tracks.is_empty() {
        return Ok(PlaylistOutcome::NoMatchingTracks);
    }

    let playlist = client
        .create_playlist(
            token,
            &user.id,
            &CreatePlaylistRequest {
                name: request.name.clone(),
                description: format!("A {} mood playlist created by Moodify 🎵", request.mood),
                public: false,
            },
        )
        .await
        .map_err(PlaylistError::at(PlaylistStep::CreatePlaylist))?;

    let uris: Vec<String> = tracks.into_iter().map(|t| t.item.uri).collect();
    if let Err(source) = client.add_tracks(token, &playlist.id, &uris).await {
        return Err(PlaylistError {
            step: PlaylistStep::AddTracks,
            playlist_id: Some(playlist.id),
            source,
        });
    }

    Ok(PlaylistOutcome::Created(CreatedPlaylist {
        id: playlist.id,
        name: playlist.name,
        external_urls: playlist.external_urls,
        tracks_added: uris.len(),
        mood: request.mood,
    }))
}
