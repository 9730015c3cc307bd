//! # Management Module
//!
//! In-memory bookkeeping for the server: logged-in sessions with their
//! Spotify tokens, and logins that are waiting for their OAuth callback.
//! See [`SessionStore`] for the lifecycle.

mod session;

pub use session::PENDING_LOGIN_TTL;
pub use session::PendingLogin;
pub use session::REFRESH_BUFFER_SECS;
pub use session::Session;
pub use session::SessionError;
pub use session::SessionStore;
