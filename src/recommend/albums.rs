use crate::{
    config::Ranking,
    mood::{
        AudioFeatures, FeatureAverages, Mood, MoodProfile, ScoredItem, filter_and_sort,
        score_aggregate,
    },
    spotify::{SpotifyClient, SpotifyError},
    types::{Album, AlbumEntry, AlbumRecommendations, AlbumSummary},
    warning,
};

/// Ranks the albums in the user's library against `mood`.
///
/// One feature lookup per album is spawned up front and every lookup is
/// awaited before ranking. A lookup that fails only costs its own album (it
/// scores `0.0`); the spawned tasks keep running even if the caller goes away.
///
/// # Errors
///
/// Only fetching the library itself can fail the whole request.
pub async fn recommend_albums(
    client: &SpotifyClient,
    token: &str,
    mood: Mood,
    ranking: &Ranking,
) -> Result<AlbumRecommendations, SpotifyError> {
    let profile = mood.profile();
    let library = client.saved_albums(token, ranking.library_max_pages).await?;

    if library.items.is_empty() {
        return Ok(AlbumRecommendations {
            mood,
            message: Some("No albums found in your library".to_string()),
            total_albums: 0,
            matching_albums: 0,
            albums: Vec::new(),
            mood_profile: profile,
        });
    }

    let total_albums = library.items.len();
    let mut handles = Vec::with_capacity(total_albums);

    for saved in library.items {
        let summary = AlbumSummary::from(&saved.album);
        let client = client.clone();
        let token = token.to_string();
        let profile = profile.clone();
        let tracks_per_album = ranking.tracks_per_album;

        let handle = tokio::spawn(async move {
            analyze_album(&client, &token, &saved.album, &profile, tracks_per_album).await
        });
        handles.push((summary, handle));
    }

    let mut scored = Vec::with_capacity(handles.len());
    for (album, handle) in handles {
        let (mood_score, audio_features) = match handle.await {
            Ok(analysis) => analysis,
            Err(e) => {
                warning!("Task join error for album {}: {}", album.name, e);
                (0.0, None)
            }
        };

        scored.push(ScoredItem::new(
            AlbumEntry {
                album,
                audio_features,
            },
            mood_score,
        ));
    }

    let mut albums = filter_and_sort(scored, ranking.album_min_score);
    let matching_albums = albums.len();
    albums.truncate(ranking.album_top_n);

    Ok(AlbumRecommendations {
        mood,
        message: None,
        total_albums,
        matching_albums,
        albums,
        mood_profile: profile,
    })
}

/// Scores one album from the features of its first `tracks_per_album` tracks.
async fn analyze_album(
    client: &SpotifyClient,
    token: &str,
    album: &Album,
    profile: &MoodProfile,
    tracks_per_album: usize,
) -> (f64, Option<FeatureAverages>) {
    let track_ids: Vec<String> = album
        .tracks
        .iter()
        .flat_map(|page| page.items.iter())
        .filter_map(|t| t.id.clone())
        .take(tracks_per_album)
        .collect();

    if track_ids.is_empty() {
        return (0.0, None);
    }

    match client.audio_features(token, &track_ids).await {
        Ok(features) => {
            let valid: Vec<AudioFeatures> = features.iter().flatten().copied().collect();
            (
                score_aggregate(&features, profile),
                FeatureAverages::from_features(&valid),
            )
        }
        Err(e) => {
            warning!("Audio features for album {} unavailable: {}", album.name, e);
            (0.0, None)
        }
    }
}
