//! # Recommendation Pipelines
//!
//! Glue between the Spotify client and the mood engine. Each pipeline fetches
//! what it needs from Spotify, scores it with [`crate::mood`] and ranks the
//! result:
//!
//! - [`recommend_albums`] fans out one feature lookup per saved album and
//!   ranks albums by their average track score.
//! - [`liked_songs`] scores the user's liked songs, optionally filtered by mood.
//! - [`create_mood_playlist`] turns the best matching liked songs into a
//!   private playlist, step by step, reporting the step that failed.

mod albums;
mod playlist;
mod tracks;

pub use albums::recommend_albums;
pub use playlist::{
    PlaylistError, PlaylistOutcome, PlaylistRequest, PlaylistStep, create_mood_playlist,
};
pub use tracks::liked_songs;
