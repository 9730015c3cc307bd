use crate::{
    config::Ranking,
    mood::{Mood, ScoredItem, filter_and_sort, score_features},
    spotify::{SpotifyClient, SpotifyError},
    types::{LikedSongs, SavedTrack, TrackAlbumSummary, TrackEntry},
};

/// The user's liked songs, optionally filtered and ranked by `mood`.
///
/// Without a mood every track with audio features is returned in library
/// order with a score of `0.0`. With one, only tracks scoring above the track
/// threshold are kept, best first. Either way at most `limit` tracks come back;
/// `matching_tracks` counts them before the limit is applied.
pub async fn liked_songs(
    client: &SpotifyClient,
    token: &str,
    mood: Option<Mood>,
    limit: usize,
    ranking: &Ranking,
) -> Result<LikedSongs, SpotifyError> {
    let label = mood.map_or_else(|| "all".to_string(), |m| m.to_string());
    let library = client.saved_tracks(token, ranking.library_max_pages).await?;

    if library.items.is_empty() {
        return Ok(LikedSongs {
            mood: label,
            message: Some("No liked songs found".to_string()),
            total_liked_songs: 0,
            matching_tracks: 0,
            tracks: Vec::new(),
        });
    }

    let total_liked_songs = library.items.len();
    let scored = score_tracks(client, token, library.items, mood).await?;

    let mut tracks = match mood {
        Some(_) => filter_and_sort(scored, ranking.track_min_score),
        None => scored,
    };
    let matching_tracks = tracks.len();
    tracks.truncate(limit);

    Ok(LikedSongs {
        mood: label,
        message: None,
        total_liked_songs,
        matching_tracks,
        tracks,
    })
}

/// Looks up features for `saved` and scores each track against `mood`.
///
/// Tracks without an id (local files) or without features are dropped.
pub(crate) async fn score_tracks(
    client: &SpotifyClient,
    token: &str,
    saved: Vec<SavedTrack>,
    mood: Option<Mood>,
) -> Result<Vec<ScoredItem<TrackEntry>>, SpotifyError> {
    let tracks: Vec<(String, SavedTrack)> = saved
        .into_iter()
        .filter_map(|s| s.track.id.clone().map(|id| (id, s)))
        .collect();

    if tracks.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = tracks.iter().map(|(id, _)| id.clone()).collect();
    let features = client.audio_features(token, &ids).await?;
    let profile = mood.map(Mood::profile);

    let scored = tracks
        .into_iter()
        .zip(features)
        .filter_map(|((id, saved), features)| {
            let features = features?;
            let mood_score = profile
                .as_ref()
                .map_or(0.0, |p| score_features(&features, p));
            let track = saved.track;

            Some(ScoredItem::new(
                TrackEntry {
                    id,
                    name: track.name,
                    artists: track.artists.into_iter().map(|a| a.name).collect(),
                    album: TrackAlbumSummary {
                        name: track.album.name,
                        images: track.album.images,
                    },
                    uri: track.uri,
                    duration_ms: track.duration_ms,
                    external_urls: track.external_urls,
                    audio_features: features,
                },
                mood_score,
            ))
        })
        .collect();

    Ok(scored)
}
