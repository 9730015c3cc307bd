//! # CLI Module
//!
//! Command-line entry points for Moodify. The binary is mostly a server, but a
//! few commands expose the mood engine directly so presets and scores can be
//! inspected without a Spotify account.
//!
//! ## Commands
//!
//! - [`serve`] - Starts the HTTP server, optionally opening it in a browser
//! - [`moods`] - Prints the mood presets as a table
//! - [`score`] - Scores one set of audio features against a mood
//!
//! ## Error Handling
//!
//! Commands report problems through the crate's logging macros. Configuration
//! errors and a server that cannot start are fatal and end the process with
//! exit code 1; bad arguments are rejected by clap before a command runs.
//!
//! ## Usage Patterns
//!
//! ```bash
//! moodify serve --open                 # Start the server and open the UI
//! moodify moods                        # Show the presets
//! moodify score --mood chill --valence 0.5 --energy 0.3 --danceability 0.4 --tempo 90
//! ```

mod moods;
mod score;
mod serve;

pub use moods::moods;
pub use score::score;
pub use serve::serve;
