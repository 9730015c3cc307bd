//! Moodify: mood-based recommendations for a Spotify library.
//!
//! This library scores tracks and albums against a small set of mood presets
//! using Spotify's audio features, and exposes the result through a local HTTP
//! server that also proxies the Spotify calls it needs. It includes modules for
//! the mood engine, the Spotify client, session handling, configuration, and
//! the command-line entry points.
//!
//! # Modules
//!
//! - `api` - HTTP handlers served by the local server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Session and pending login bookkeeping
//! - `mood` - Mood presets, scoring and ranking
//! - `recommend` - Album, liked song and playlist pipelines
//! - `server` - Router construction and the server loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use moodify::mood::{AudioFeatures, Mood, score_features};
//!
//! let features = AudioFeatures { valence: 0.8, energy: 0.7, danceability: 0.7, tempo: 124.0 };
//! let score = score_features(&features, &Mood::Happy.profile());
//! assert!(score > 0.0);
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod mood;
pub mod recommend;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed error result used by the CLI and server plumbing, where errors are
/// only reported, never matched on.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a progress line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`:
///
/// ```
/// info!("Scoring {} liked songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completed action prefixed with a green `✓`.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with code 1.
///
/// Only for startup failures in the CLI; request handlers report errors
/// through their responses instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for something degraded but recoverable, such as
/// an album whose audio features could not be fetched.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
