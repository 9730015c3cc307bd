use serde::de::DeserializeOwned;

use super::{SpotifyClient, SpotifyError};
use crate::types::{Library, Page, SavedAlbum, SavedTrack};

/// Largest page size the library endpoints accept.
pub const PAGE_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Albums saved in the user's library, newest first.
    ///
    /// Fetches pages of 50 and follows the `next` link for at most
    /// `max_pages` pages (at least one page is always requested).
    pub async fn saved_albums(
        &self,
        token: &str,
        max_pages: usize,
    ) -> Result<Library<SavedAlbum>, SpotifyError> {
        self.paged(&self.api_url("/me/albums"), token, max_pages)
            .await
    }

    /// Tracks saved in the user's library ("Liked Songs"), newest first.
    pub async fn saved_tracks(
        &self,
        token: &str,
        max_pages: usize,
    ) -> Result<Library<SavedTrack>, SpotifyError> {
        self.paged(&self.api_url("/me/tracks"), token, max_pages)
            .await
    }

    async fn paged<T: DeserializeOwned>(
        &self,
        first_url: &str,
        token: &str,
        max_pages: usize,
    ) -> Result<Library<T>, SpotifyError> {
        let first: Page<T> = self
            .get_json(first_url, token, &[("limit", PAGE_LIMIT.to_string())])
            .await?;

        let mut total = first.total;
        let mut items = first.items;
        let mut next = first.next;
        let mut pages = 1;

        while let Some(url) = next.take() {
            if pages >= max_pages {
                break;
            }

            // `next` already carries offset and limit
            let page: Page<T> = self.get_json(&url, token, &[]).await?;
            total = page.total.or(total);
            items.extend(page.items);
            next = page.next;
            pages += 1;
        }

        Ok(Library {
            total: total.unwrap_or(items.len() as u64),
            items,
        })
    }
}
