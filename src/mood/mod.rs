//! # Mood Scoring Engine
//!
//! Pure functions that score audio features against mood profiles and rank
//! the results. Nothing in here performs I/O or holds state, so every function
//! is safe to call from any number of requests at once.
//!
//! ## Scoring
//!
//! A [`MoodProfile`] constrains some of the four [`Feature`]s with an inclusive
//! [`FeatureRange`] and a weight. [`score_features`] rewards values close to a
//! range's midpoint and normalizes by the total weight of the constrained
//! features, so a track that misses one range can never reach a perfect score.
//! [`score_aggregate`] averages that score over an album's tracks.
//!
//! ## Ranking
//!
//! [`rank_and_filter`] drops items at or below a threshold, sorts the rest by
//! score (stable) and keeps the top entries.
//!
//! ## Presets
//!
//! [`Mood`] is the one authoritative table of mood definitions:
//!
//! ```text
//! happy      valence [0.7, 1.0]  energy [0.5, 1.0]
//! sad        valence [0.0, 0.3]  energy [0.0, 0.5]
//! energetic  valence [0.4, 1.0]  energy [0.7, 1.0]  danceability [0.5, 1.0]
//! chill      valence [0.3, 0.7]  energy [0.2, 0.5]  tempo [60, 120]
//! ```

mod profile;
mod rank;
mod score;

pub use profile::{Feature, FeatureRange, Mood, MoodError, MoodProfile};
pub use rank::{ScoredItem, filter_and_sort, rank_and_filter};
pub use score::{AudioFeatures, FeatureAverages, score_aggregate, score_features};
