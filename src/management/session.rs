use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::Token,
    utils,
};

/// Refresh tokens this many seconds before they actually expire.
pub const REFRESH_BUFFER_SECS: u64 = 300;

/// How long a login may sit between `/auth/login` and `/callback`.
pub const PENDING_LOGIN_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session credential provided")]
    Missing,
    #[error("unknown or expired session")]
    Unknown,
    #[error("token refresh failed: {0}")]
    Refresh(#[source] SpotifyError),
}

/// A login started by `/auth/login`, waiting for its callback.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub state: String,
    pub code_verifier: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub token: Token,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Sessions and pending logins, shared by every request handler.
///
/// A session is created when the OAuth callback succeeds and is discarded on
/// logout, when its token can no longer be refreshed, or once it has been idle
/// longer than the configured TTL.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    pending: Arc<RwLock<HashMap<String, PendingLogin>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a login with a fresh `state` and PKCE verifier.
    pub async fn begin_login(&self) -> PendingLogin {
        let login = PendingLogin {
            state: utils::generate_state(),
            code_verifier: utils::generate_code_verifier(),
            created_at: Utc::now(),
        };

        self.pending
            .write()
            .await
            .insert(login.state.clone(), login.clone());
        login
    }

    /// Removes and returns the pending login for `state`.
    ///
    /// A state can be redeemed once; logins older than [`PENDING_LOGIN_TTL`]
    /// are discarded instead of returned.
    pub async fn take_login(&self, state: &str) -> Option<PendingLogin> {
        let login = self.pending.write().await.remove(state)?;
        if is_older_than(login.created_at, PENDING_LOGIN_TTL) {
            return None;
        }
        Some(login)
    }

    /// Stores `token` under a new session id and returns the id.
    pub async fn create(&self, token: Token) -> String {
        let now = Utc::now();
        let session = Session {
            id: utils::generate_session_id(),
            token,
            created_at: now,
            last_seen: now,
        };

        let id = session.id.clone();
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// A usable access token for the session, refreshing it when it is about
    /// to expire.
    ///
    /// A failed refresh drops the session: the caller has to log in again.
    pub async fn access_token(
        &self,
        id: &str,
        client: &SpotifyClient,
    ) -> Result<String, SessionError> {
        let token = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(id).ok_or(SessionError::Unknown)?;
            session.last_seen = Utc::now();
            session.token.clone()
        };

        if !token.expires_within(REFRESH_BUFFER_SECS) {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh(id, client).await?;
        Ok(refreshed.access_token)
    }

    /// Refreshes the session's token unconditionally.
    pub async fn refresh(&self, id: &str, client: &SpotifyClient) -> Result<Token, SessionError> {
        let refresh_token = self
            .get(id)
            .await
            .ok_or(SessionError::Unknown)?
            .token
            .refresh_token;

        match client.refresh_token(&refresh_token).await {
            Ok(token) => {
                let mut sessions = self.sessions.write().await;
                let session = sessions.get_mut(id).ok_or(SessionError::Unknown)?;
                session.token = token.clone();
                session.last_seen = Utc::now();
                Ok(token)
            }
            Err(e) => {
                self.remove(id).await;
                Err(SessionError::Refresh(e))
            }
        }
    }

    /// Drops sessions idle for longer than `max_idle` and stale pending
    /// logins. Returns how many sessions were dropped.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        self.pending
            .write()
            .await
            .retain(|_, login| !is_older_than(login.created_at, PENDING_LOGIN_TTL));

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !is_older_than(s.last_seen, max_idle));
        before - sessions.len()
    }
}

fn is_older_than(instant: DateTime<Utc>, age: Duration) -> bool {
    let age = chrono::Duration::from_std(age).unwrap_or(chrono::Duration::MAX);
    Utc::now() - instant > age
}
