use super::{SpotifyClient, SpotifyError};
use crate::{
    mood::AudioFeatures,
    types::{AudioFeaturesResponse, RawAudioFeatures},
};

/// Most track ids the audio features endpoint accepts per request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    /// Audio features for `track_ids`, one entry per id, in request order.
    ///
    /// Ids are sent in batches of 100. An entry is `None` when Spotify has no
    /// analysis for the track or the analysis lacks one of the values the mood
    /// engine scores.
    pub async fn audio_features(
        &self,
        token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, SpotifyError> {
        let raw = self.raw_audio_features(token, track_ids).await?;
        Ok(raw
            .into_iter()
            .map(|f| f.and_then(RawAudioFeatures::into_features))
            .collect())
    }

    /// Audio features exactly as Spotify reports them.
    pub async fn raw_audio_features(
        &self,
        token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<RawAudioFeatures>>, SpotifyError> {
        let url = self.api_url("/audio-features");
        let mut features = Vec::with_capacity(track_ids.len());

        for chunk in track_ids.chunks(MAX_IDS_PER_REQUEST) {
            let response: AudioFeaturesResponse = self
                .get_json(&url, token, &[("ids", chunk.join(","))])
                .await?;

            // keep positions aligned with the ids even if a batch comes back short
            let mut batch = response.audio_features;
            batch.resize(chunk.len(), None);
            features.extend(batch);
        }

        Ok(features)
    }
}
