//! Configuration management for Moodify.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, and the
//! ranking thresholds used when matching a library against a mood.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::spotify::RetryPolicy;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5500";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email user-library-read user-top-read user-modify-playback-state user-read-playback-state streaming playlist-modify-public playlist-modify-private";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads environment variables from `.env` files.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `moodify/.env`, then from a `.env` file in the
/// working directory. Variables that are already set are never overwritten,
/// and missing files are not an error.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/moodify/.env`
/// - macOS: `~/Library/Application Support/moodify/.env`
/// - Windows: `%LOCALAPPDATA%/moodify/.env`
///
/// # Errors
///
/// Returns an error if the configuration directory cannot be created.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        let _ = dotenv::from_path(&path);
    }
    let _ = dotenv::dotenv();

    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodify/.env");
    path
}

/// Everything needed to talk to Spotify.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Thresholds and sizes for the recommendation pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Albums must score strictly above this to be recommended.
    pub album_min_score: f64,
    pub album_top_n: usize,
    /// Liked songs must score strictly above this to match a mood.
    pub track_min_score: f64,
    /// Default number of liked songs returned when the caller sets no limit.
    pub track_limit: usize,
    /// Tracks sampled per album for feature lookup.
    pub tracks_per_album: usize,
    pub playlist_track_count: usize,
    /// Pages of 50 fetched from the saved albums/tracks endpoints.
    pub library_max_pages: usize,
}

impl Default for Ranking {
    fn default() -> Self {
        Self {
            album_min_score: 0.25,
            album_top_n: 20,
            track_min_score: 0.30,
            track_limit: 50,
            tracks_per_album: 10,
            playlist_track_count: 25,
            library_max_pages: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_address: String,
    pub static_dir: PathBuf,
    pub session_idle_ttl: Duration,
    pub spotify: SpotifySettings,
    pub ranking: Ranking,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_REDIRECT_URI` is unset, and [`ConfigError::Invalid`] when a
    /// numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Ranking::default();
        let retry_defaults = RetryPolicy::default();

        Ok(Self {
            server_address: server_addr(),
            static_dir: PathBuf::from(var_or("STATIC_DIR", "public")),
            session_idle_ttl: Duration::from_secs(parse_var("SESSION_IDLE_TTL", 86_400)?),
            spotify: SpotifySettings {
                client_id: spotify_client_id()?,
                client_secret: spotify_client_secret(),
                redirect_uri: spotify_redirect_uri()?,
                scope: var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
                auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
                api_url: var_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            },
            ranking: Ranking {
                album_min_score: parse_var("ALBUM_MIN_SCORE", defaults.album_min_score)?,
                album_top_n: parse_var("ALBUM_TOP_N", defaults.album_top_n)?,
                track_min_score: parse_var("TRACK_MIN_SCORE", defaults.track_min_score)?,
                track_limit: parse_var("TRACK_LIMIT", defaults.track_limit)?,
                tracks_per_album: parse_var("TRACKS_PER_ALBUM", defaults.tracks_per_album)?,
                playlist_track_count: parse_var(
                    "PLAYLIST_TRACK_COUNT",
                    defaults.playlist_track_count,
                )?,
                library_max_pages: parse_var("LIBRARY_MAX_PAGES", defaults.library_max_pages)?,
            },
            retry: RetryPolicy {
                max_retries: parse_var("UPSTREAM_MAX_RETRIES", retry_defaults.max_retries)?,
                max_retry_after: Duration::from_secs(parse_var(
                    "UPSTREAM_MAX_RETRY_AFTER",
                    retry_defaults.max_retry_after.as_secs(),
                )?),
                ..retry_defaults
            },
        })
    }
}

/// Returns the address the HTTP server binds to.
///
/// `SERVER_ADDRESS` wins when set. Otherwise a `PORT` variable, as set by most
/// hosting platforms, binds all interfaces on that port, and without either the
/// server listens on `127.0.0.1:5500`.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:5500"
/// ```
pub fn server_addr() -> String {
    if let Ok(addr) = env::var("SERVER_ADDRESS") {
        return addr;
    }

    match env::var("PORT") {
        Ok(port) => format!("0.0.0.0:{port}"),
        Err(_) => DEFAULT_SERVER_ADDRESS.to_string(),
    }
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains the
/// client ID obtained when registering the application with Spotify's
/// developer platform.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret, if one is configured.
///
/// Without a secret the authorization code exchange relies on PKCE alone.
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Option<String> {
    env::var("SPOTIFY_CLIENT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings and point at this server's `/callback` route.
///
/// # Example
///
/// ```
/// let redirect_uri = spotify_redirect_uri()?; // e.g., "http://127.0.0.1:5500/callback"
/// ```
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_REDIRECT_URI")
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
