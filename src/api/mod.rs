//! # API Module
//!
//! HTTP endpoints served by Moodify. Handlers are thin: they pull the session
//! and parameters out of the request, call into [`crate::recommend`] or the
//! [`crate::spotify`] client, and turn failures into JSON errors through
//! [`ApiError`].
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Starts the Spotify OAuth 2.0 PKCE flow and returns the
//!   authorization URL.
//! - [`callback`] - Completes the flow, creates a session and redirects to the
//!   frontend with the session id.
//! - [`refresh_token`] - Forces a token refresh for the current session.
//! - [`logout`] - Discards the current session.
//!
//! ### Library and Recommendations
//!
//! - [`moods`] - The mood presets with their ranges and weights.
//! - [`albums`] / [`audio_features`] - Pass-through views of the user's
//!   library and Spotify's audio analysis.
//! - [`recommend_albums`] - Saved albums ranked against a mood.
//! - [`liked_songs`] - Liked songs, optionally scored and filtered by mood.
//! - [`create_playlist`] - Builds a private playlist from the best matching
//!   liked songs.
//!
//! ### Monitoring
//!
//! - [`health`] - Application status and version.
//!
//! ## Sessions
//!
//! Authenticated routes identify the caller through the `X-Session-Id` header
//! or the `session` query parameter, see [`AuthSession`].

mod auth;
mod error;
mod health;
mod library;
mod moods;
mod recommend;
mod session;

pub use auth::{callback, login, logout, refresh_token};
pub use error::{ApiError, ApiResult};
pub use health::health;
pub use library::{albums, audio_features};
pub use moods::moods;
pub use recommend::{create_playlist, liked_songs, recommend_albums};
pub use session::{AuthSession, SESSION_HEADER, SessionId, session_id};
