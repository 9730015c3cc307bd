//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API that Moodify
//! needs: the OAuth token endpoint, the user's saved albums and tracks, audio
//! feature lookup, and playlist creation.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API / Recommendation pipelines
//!          ↓
//! SpotifyClient
//!     ├── auth      (authorization URL, code exchange, refresh)
//!     ├── library   (saved albums, saved tracks, paging)
//!     ├── features  (audio features in batches of 100)
//!     └── playlist  (current user, create playlist, add tracks)
//!          ↓
//! reqwest → Spotify Web API
//! ```
//!
//! ## Rate Limiting and Retries
//!
//! Every request goes through a single send loop governed by a [`RetryPolicy`]:
//! - **429 Too Many Requests**: reads `Retry-After` and waits, as long as
//!   attempts remain and the delay is acceptable. Otherwise the call fails with
//!   [`SpotifyError::RateLimited`] so the caller can relay the delay.
//! - **502 Bad Gateway**: waits a fixed backoff and retries.
//! - **401 Unauthorized**: fails with [`SpotifyError::Unauthorized`] so the
//!   session layer can refresh or drop the token.
//!
//! ## Thread Safety
//!
//! [`SpotifyClient`] is cheap to clone (the inner `reqwest::Client` is
//! reference counted) and can be moved into spawned tasks freely.

pub mod auth;
pub mod features;
pub mod library;
pub mod playlist;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::sleep;

use crate::{config::SpotifySettings, warning};

/// Delay assumed when a 429 response carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("access token expired or revoked")]
    Unauthorized,
    #[error("Spotify responded with {status}: {message}")]
    Status { status: u16, message: String },
}

impl SpotifyError {
    /// The HTTP status that best describes this failure to a caller.
    pub fn status_code(&self) -> u16 {
        match self {
            SpotifyError::Http(e) => e.status().map_or(502, |s| s.as_u16()),
            SpotifyError::RateLimited { .. } => 429,
            SpotifyError::Unauthorized => 401,
            SpotifyError::Status { status, .. } => *status,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Longest `Retry-After` the client is willing to sleep through.
    pub max_retry_after: Duration,
    pub bad_gateway_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            max_retry_after: Duration::from_secs(120),
            bad_gateway_backoff: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    settings: Arc<SpotifySettings>,
    retry: RetryPolicy,
}

impl SpotifyClient {
    pub fn new(settings: SpotifySettings, retry: RetryPolicy) -> Self {
        Self {
            http: Client::new(),
            settings: Arc::new(settings),
            retry,
        }
    }

    pub fn settings(&self) -> &SpotifySettings {
        &self.settings
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{base}{path}",
            base = self.settings.api_url.trim_end_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let response = self
            .send(|| self.http.get(url).bearer_auth(token).query(query))
            .await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends the request built by `build`, retrying per the [`RetryPolicy`].
    ///
    /// `build` is called once per attempt since a `RequestBuilder` is consumed
    /// when sent.
    async fn send<F>(&self, build: F) -> Result<Response, SpotifyError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            let response = build().send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let can_retry = attempt < self.retry.max_retries;
            attempt += 1;

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(&response);
                    if can_retry && Duration::from_secs(retry_after) <= self.retry.max_retry_after
                    {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue; // retry
                    }

                    if retry_after > self.retry.max_retry_after.as_secs() {
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds.",
                            retry_after
                        );
                    }
                    return Err(SpotifyError::RateLimited { retry_after });
                }
                StatusCode::BAD_GATEWAY if can_retry => {
                    sleep(self.retry.bad_gateway_backoff).await;
                    continue; // retry
                }
                StatusCode::UNAUTHORIZED => return Err(SpotifyError::Unauthorized),
                _ => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(SpotifyError::Status {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
