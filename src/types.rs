use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::mood::{AudioFeatures, FeatureAverages, Mood, MoodProfile, ScoredItem};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// True when the token expires within `buffer_secs` from now.
    pub fn expires_within(&self, buffer_secs: u64) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        now.saturating_add(buffer_secs) >= self.obtained_at.saturating_add(self.expires_in)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub total_tracks: u32,
    pub uri: String,
    #[serde(default)]
    pub tracks: Option<Page<AlbumTrack>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub album: Album,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: TrackAlbum,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Track,
}

/// A library listing: the items fetched plus the size the upstream reported.
#[derive(Debug, Clone, Serialize)]
pub struct Library<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Audio features as the upstream reports them; any value may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAudioFeatures {
    pub id: Option<String>,
    pub valence: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub tempo: Option<f64>,
}

impl RawAudioFeatures {
    /// The scoreable record, or `None` when any of the four values is absent.
    pub fn into_features(self) -> Option<AudioFeatures> {
        Some(AudioFeatures {
            valence: self.valence?,
            energy: self.energy?,
            danceability: self.danceability?,
            tempo: self.tempo?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<RawAudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub images: Vec<Image>,
    pub external_urls: ExternalUrls,
    pub release_date: String,
    pub total_tracks: u32,
    pub uri: String,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.clone(),
            name: album.name.clone(),
            artists: album.artists.iter().map(|a| a.name.clone()).collect(),
            images: album.images.clone(),
            external_urls: album.external_urls.clone(),
            release_date: album.release_date.clone(),
            total_tracks: album.total_tracks,
            uri: album.uri.clone(),
        }
    }
}

/// An album as listed in recommendations; its score sits beside it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    pub album: AlbumSummary,
    pub audio_features: Option<FeatureAverages>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecommendations {
    pub mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_albums: usize,
    pub matching_albums: usize,
    pub albums: Vec<ScoredItem<AlbumEntry>>,
    pub mood_profile: MoodProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackAlbumSummary {
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEntry {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: TrackAlbumSummary,
    pub uri: String,
    #[serde(rename = "duration_ms")]
    pub duration_ms: u64,
    #[serde(rename = "external_urls")]
    pub external_urls: ExternalUrls,
    pub audio_features: AudioFeatures,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedSongs {
    /// The mood name, or `"all"` when no mood was requested.
    pub mood: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_liked_songs: usize,
    pub matching_tracks: usize,
    pub tracks: Vec<ScoredItem<TrackEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
    pub tracks_added: usize,
    pub mood: Mood,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodDefinition {
    pub mood: Mood,
    pub profile: MoodProfile,
}

#[derive(Tabled)]
pub struct MoodTableRow {
    pub mood: String,
    pub ranges: String,
    pub weights: String,
}

impl From<Mood> for MoodTableRow {
    fn from(mood: Mood) -> Self {
        let profile = mood.profile();
        let ranges = profile
            .ranges
            .iter()
            .map(|(f, r)| format!("{f} [{}, {}]", r.min, r.max))
            .collect::<Vec<_>>()
            .join(", ");
        let weights = profile
            .ranges
            .keys()
            .map(|f| format!("{f} {:.2}", profile.weight(*f)))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            mood: mood.to_string(),
            ranges,
            weights,
        }
    }
}

/// Query-string parameters shared by several routes.
pub type QueryParams = HashMap<String, String>;
