use super::{SpotifyClient, SpotifyError};
use crate::types::{
    AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, Playlist,
    UserProfile,
};

/// Most track URIs a single "add items" request accepts.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    /// Profile of the user the token belongs to.
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, SpotifyError> {
        self.get_json(&self.api_url("/me"), token, &[]).await
    }

    /// Creates a playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist, SpotifyError> {
        let url = self.api_url(&format!("/users/{user_id}/playlists"));
        let response = self
            .send(|| self.http.post(&url).bearer_auth(token).json(request))
            .await?;

        Ok(response.json::<Playlist>().await?)
    }

    /// Appends `uris` to a playlist in chunks of 100, in order.
    ///
    /// Returns the snapshot id of the last chunk written. Chunks already
    /// written stay in the playlist when a later chunk fails.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Option<String>, SpotifyError> {
        let url = self.api_url(&format!("/playlists/{playlist_id}/tracks"));
        let mut snapshot_id = None;

        for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let response = self
                .send(|| self.http.post(&url).bearer_auth(token).json(&body))
                .await?;

            let added = response.json::<AddTrackToPlaylistResponse>().await?;
            snapshot_id = Some(added.snapshot_id);
        }

        Ok(snapshot_id)
    }
}
