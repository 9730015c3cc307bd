use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    Res, api,
    config::Settings,
    info,
    management::SessionStore,
    spotify::SpotifyClient,
    success,
};

/// How often idle sessions and stale logins are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Shared state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub spotify: SpotifyClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let spotify = SpotifyClient::new(settings.spotify.clone(), settings.retry.clone());
        Self {
            settings: Arc::new(settings),
            spotify,
            sessions: SessionStore::new(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(api::health))
        .route("/auth/login", get(api::login))
        .route("/auth/logout", post(api::logout))
        .route("/callback", get(api::callback))
        .route("/api/refresh-token", post(api::refresh_token))
        .route("/api/moods", get(api::moods))
        .route("/api/albums", get(api::albums))
        .route("/api/audio-features", get(api::audio_features))
        .route("/api/recommend-albums", get(api::recommend_albums))
        .route("/api/liked-songs", get(api::liked_songs))
        .route("/api/create-playlist", post(api::create_playlist));

    let static_dir = &state.settings.static_dir;
    let router = if static_dir.is_dir() {
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    };

    router.with_state(state)
}

pub async fn start_api_server(settings: Settings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_address)
        .map_err(|e| format!("Failed to parse server address: {e}"))?;
    let idle_ttl = settings.session_idle_ttl;

    let state = AppState::new(settings);
    spawn_session_purge(state.sessions.clone(), idle_ttl);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!("Moodify listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_session_purge(sessions: SessionStore, idle_ttl: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_idle(idle_ttl).await;
            if purged > 0 {
                info!("Dropped {} idle session(s).", purged);
            }
        }
    });
}
