use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use moodify::{
    api::SESSION_HEADER,
    config::{Ranking, Settings, SpotifySettings},
    server::{AppState, build_router},
    spotify::RetryPolicy,
    types::Token,
};

/// Track URIs the fake Spotify received for each playlist.
type AddedTracks = Arc<Mutex<Vec<String>>>;

fn features_for(id: &str) -> Value {
    // (valence, energy, danceability, tempo)
    let (v, e, d, t) = match id {
        "t1" => (0.85, 0.75, 0.8, 128.0),
        "t2" => (0.8, 0.7, 0.6, 110.0),
        "t3" => (0.1, 0.2, 0.3, 70.0),
        _ => return Value::Null,
    };
    json!({ "id": id, "valence": v, "energy": e, "danceability": d, "tempo": t })
}

fn track(id: Option<&str>, name: &str) -> Value {
    json!({
        "track": {
            "id": id,
            "name": name,
            "artists": [{ "id": "a1", "name": "Artist" }],
            "album": { "name": "Album", "images": [] },
            "uri": format!("spotify:track:{}", id.unwrap_or("local")),
            "duration_ms": 180000,
            "external_urls": { "spotify": "https://open.spotify.com/track/x" }
        }
    })
}

fn album(id: &str, name: &str, track_ids: &[&str]) -> Value {
    let tracks: Vec<Value> = track_ids
        .iter()
        .map(|t| json!({ "id": t, "name": t, "uri": format!("spotify:track:{t}") }))
        .collect();
    json!({
        "album": {
            "id": id,
            "name": name,
            "artists": [{ "id": "a1", "name": "Artist" }],
            "images": [],
            "release_date": "2020-01-01",
            "total_tracks": track_ids.len(),
            "uri": format!("spotify:album:{id}"),
            "tracks": { "items": tracks, "total": track_ids.len(), "next": null }
        }
    })
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim_start_matches("Bearer ")
        .to_string()
}

async fn fake_albums(headers: HeaderMap) -> Response {
    if bearer(&headers) == "limited" {
        return (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "500")]).into_response();
    }

    Json(json!({
        "items": [
            album("al1", "Bright", &["t1", "t2"]),
            album("al2", "Gloom", &["t3"]),
            album("al3", "Empty", &[]),
        ],
        "total": 3,
        "next": null
    }))
    .into_response()
}

async fn fake_tracks() -> Json<Value> {
    Json(json!({
        "items": [
            track(Some("t1"), "Sunny"),
            track(Some("t3"), "Rainy"),
            track(Some("t4"), "Unanalyzed"),
            track(None, "Local file"),
        ],
        "total": 4,
        "next": null
    }))
}

async fn fake_audio_features(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let ids: Vec<&str> = params
        .get("ids")
        .map(|ids| ids.split(',').collect())
        .unwrap_or_default();

    // "gloomfail" sessions cannot analyze the Gloom album's only track
    if bearer(&headers) == "gloomfail" && ids.contains(&"t3") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let features: Vec<Value> = ids.into_iter().map(features_for).collect();
    Json(json!({ "audio_features": features })).into_response()
}

async fn fake_me() -> Json<Value> {
    Json(json!({ "id": "user1", "display_name": "Test User" }))
}

async fn fake_create_playlist(Path(_user): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": "pl1",
        "name": body["name"],
        "external_urls": { "spotify": "https://open.spotify.com/playlist/pl1" }
    }))
}

async fn fake_add_tracks(
    State(added): State<AddedTracks>,
    headers: HeaderMap,
    Path(_playlist): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers) == "addfail" {
        return StatusCode::BAD_GATEWAY.into_response();
    }

    if let Some(uris) = body["uris"].as_array() {
        let mut added = added.lock().unwrap();
        added.extend(uris.iter().filter_map(|u| u.as_str().map(str::to_string)));
    }
    Json(json!({ "snapshot_id": "snap1" })).into_response()
}

async fn fake_token() -> Json<Value> {
    Json(json!({
        "access_token": "fresh",
        "refresh_token": "refresh2",
        "scope": "user-library-read",
        "expires_in": 3600
    }))
}

/// Starts a fake Spotify on an ephemeral port and returns its base URL.
async fn spawn_fake_spotify(added: AddedTracks) -> String {
    let app = Router::new()
        .route("/v1/me", get(fake_me))
        .route("/v1/me/albums", get(fake_albums))
        .route("/v1/me/tracks", get(fake_tracks))
        .route("/v1/audio-features", get(fake_audio_features))
        .route("/v1/users/{user}/playlists", post(fake_create_playlist))
        .route("/v1/playlists/{playlist}/tracks", post(fake_add_tracks))
        .route("/api/token", post(fake_token))
        .with_state(added);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

struct TestApp {
    state: AppState,
    added: AddedTracks,
}

impl TestApp {
    async fn new() -> Self {
        let added = AddedTracks::default();
        let base = spawn_fake_spotify(added.clone()).await;

        let settings = Settings {
            server_address: "127.0.0.1:0".to_string(),
            static_dir: PathBuf::from("does-not-exist"),
            session_idle_ttl: Duration::from_secs(3600),
            spotify: SpotifySettings {
                client_id: "client".to_string(),
                client_secret: None,
                redirect_uri: "http://127.0.0.1:5500/callback".to_string(),
                scope: "user-library-read".to_string(),
                auth_url: format!("{base}/authorize"),
                token_url: format!("{base}/api/token"),
                api_url: format!("{base}/v1"),
            },
            ranking: Ranking::default(),
            retry: RetryPolicy {
                max_retries: 1,
                max_retry_after: Duration::from_secs(120),
                bad_gateway_backoff: Duration::ZERO,
            },
        };

        Self {
            state: AppState::new(settings),
            added,
        }
    }

    async fn session(&self, access_token: &str, expires_in: u64) -> String {
        self.state
            .sessions
            .create(Token {
                access_token: access_token.to_string(),
                refresh_token: "refresh".to_string(),
                scope: String::new(),
                expires_in,
                obtained_at: Utc::now().timestamp() as u64,
            })
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    async fn get(&self, uri: &str, session: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(id) = session {
            request = request.header(SESSION_HEADER, id);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn post_json(&self, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(SESSION_HEADER, session)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, body) = self.send(request).await;
        (status, body)
    }
}

fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_moods_lists_presets() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/api/moods", None).await;

    assert_eq!(status, StatusCode::OK);
    let moods = body.as_array().unwrap();
    assert_eq!(moods.len(), 4);
    assert_eq!(moods[0]["mood"], "happy");
    assert_eq!(moods[0]["profile"]["weights"]["valence"], 0.6);
    assert_eq!(moods[3]["profile"]["ranges"]["tempo"]["max"], 120.0);
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/api/recommend-albums?mood=happy", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No session provided");
}

#[tokio::test]
async fn test_unknown_session_is_unauthorized() {
    let app = TestApp::new().await;
    let (status, _, body) = app
        .get("/api/recommend-albums?mood=happy", Some("bogus"))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
}

#[tokio::test]
async fn test_invalid_and_missing_mood() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, body) = app
        .get("/api/recommend-albums?mood=angry", Some(&session))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid mood 'angry'. Valid moods: happy, sad, energetic, chill"
    );

    let (status, _, body) = app.get("/api/recommend-albums", Some(&session)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing mood parameter");
}

#[tokio::test]
async fn test_session_from_query_parameter() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, body) = app
        .get(&format!("/api/albums?session={session}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"][0]["album"]["name"], "Bright");
}

#[tokio::test]
async fn test_recommend_albums() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, body) = app
        .get("/api/recommend-albums?mood=happy", Some(&session))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"], "happy");
    assert_eq!(body["totalAlbums"], 3);
    assert_eq!(body["matchingAlbums"], 1);
    assert_eq!(body["moodProfile"]["ranges"]["valence"]["min"], 0.7);

    let albums = body["albums"].as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0]["album"]["name"], "Bright");
    // t1 scores 1.0; t2 scores (2/3 * 0.6 + 0.8 * 0.4)
    assert!(approx(&albums[0]["moodScore"], (1.0 + 0.72) / 2.0));
    assert!(approx(&albums[0]["audioFeatures"]["avgValence"], 0.825));
}

#[tokio::test]
async fn test_failed_album_lookup_only_costs_that_album() {
    let app = TestApp::new().await;
    let session = app.session("gloomfail", 3600).await;

    // Gloom would be the only sad match; without features it scores 0
    let (status, _, body) = app
        .get("/api/recommend-albums?mood=sad", Some(&session))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAlbums"], 3);
    assert_eq!(body["matchingAlbums"], 0);
    assert!(body["albums"].as_array().unwrap().is_empty());

    // the other albums are still scored in the same batch
    let (status, _, body) = app
        .get("/api/recommend-albums?mood=happy", Some(&session))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAlbums"], 3);
    assert_eq!(body["matchingAlbums"], 1);
    assert_eq!(body["albums"][0]["album"]["name"], "Bright");
    assert!(approx(&body["albums"][0]["moodScore"], (1.0 + 0.72) / 2.0));
}

#[tokio::test]
async fn test_liked_songs_without_mood() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, body) = app.get("/api/liked-songs", Some(&session)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"], "all");
    assert_eq!(body["totalLikedSongs"], 4);

    // the unanalyzed track and the local file are dropped
    let tracks = body["tracks"].as_array().unwrap();
    let ids: Vec<&str> = tracks.iter().filter_map(|t| t["id"].as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3"]);
    assert_eq!(tracks[0]["moodScore"], 0.0);
    assert_eq!(tracks[0]["duration_ms"], 180000);
    assert_eq!(tracks[0]["audioFeatures"]["tempo"], 128.0);
}

#[tokio::test]
async fn test_liked_songs_filtered_by_mood() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, body) = app
        .get("/api/liked-songs?mood=sad&limit=10", Some(&session))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"], "sad");
    assert_eq!(body["matchingTracks"], 1);
    assert_eq!(body["tracks"][0]["id"], "t3");
    assert!(body["tracks"][0]["moodScore"].as_f64().unwrap() > 0.3);
}

#[tokio::test]
async fn test_audio_features_requires_ids() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _, _) = app.get("/api/audio-features", Some(&session)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = app
        .get("/api/audio-features?track_ids=t1,t4", Some(&session))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["valence"], 0.85);
    assert!(body[1].is_null());
}

#[tokio::test]
async fn test_create_playlist() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, body) = app
        .post_json(
            "/api/create-playlist",
            &session,
            json!({ "mood": "happy", "playlistName": "Good Vibes", "trackCount": "5" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Successfully created playlist \"Good Vibes\" with 1 tracks!"
    );
    assert_eq!(body["playlist"]["id"], "pl1");
    assert_eq!(body["playlist"]["tracks_added"], 1);
    assert_eq!(body["playlist"]["mood"], "happy");
    assert_eq!(*app.added.lock().unwrap(), vec!["spotify:track:t1"]);
}

#[tokio::test]
async fn test_create_playlist_without_matches() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, body) = app
        .post_json(
            "/api/create-playlist",
            &session,
            json!({ "mood": "chill", "playlistName": "Calm" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "No liked songs found matching chill mood. Try a different mood!"
    );
    assert!(app.added.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_playlist_reports_failed_step() {
    let app = TestApp::new().await;
    let session = app.session("addfail", 3600).await;

    let (status, body) = app
        .post_json(
            "/api/create-playlist",
            &session,
            json!({ "mood": "happy", "playlistName": "Good Vibes" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["step"], "add_tracks");
    assert_eq!(body["playlistId"], "pl1");
    assert_eq!(body["error"], "Playlist created but failed to add tracks");
    assert!(app.added.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_playlist_requires_name() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let (status, _) = app
        .post_json("/api/create-playlist", &session, json!({ "mood": "happy" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_is_relayed() {
    let app = TestApp::new().await;
    let session = app.session("limited", 3600).await;

    let (status, _, body) = app.get("/api/albums", Some(&session)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["retryAfter"], 500);
}

#[tokio::test]
async fn test_expiring_token_is_refreshed() {
    let app = TestApp::new().await;
    let session = app.session("stale", 60).await;

    let (status, _, _) = app.get("/api/albums", Some(&session)).await;
    assert_eq!(status, StatusCode::OK);

    let stored = app.state.sessions.get(&session).await.unwrap();
    assert_eq!(stored.token.access_token, "fresh");
    assert_eq!(stored.token.refresh_token, "refresh2");
}

#[tokio::test]
async fn test_refresh_token_route() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/refresh-token")
        .header(SESSION_HEADER, &session)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expires_in"], 3600);
}

#[tokio::test]
async fn test_login_and_callback() {
    let app = TestApp::new().await;

    let (status, _, body) = app.get("/auth/login", None).await;
    assert_eq!(status, StatusCode::OK);

    let url = reqwest::Url::parse(body["url"].as_str().unwrap()).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["code_challenge_method"], "S256");
    assert_eq!(params["client_id"], "client");
    let state = params["state"].clone();

    let (status, headers, _) = app
        .get(&format!("/callback?code=abc&state={state}"), None)
        .await;
    assert!(status.is_redirection());
    let location = headers[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/?session="));
    assert!(location.ends_with("&expires_in=3600"));
    assert_eq!(app.state.sessions.len().await, 1);

    // the same state cannot be redeemed twice
    let (_, headers, _) = app
        .get(&format!("/callback?code=abc&state={state}"), None)
        .await;
    assert_eq!(headers[header::LOCATION], "/#error=state_mismatch");
}

#[tokio::test]
async fn test_callback_errors() {
    let app = TestApp::new().await;

    let (_, headers, _) = app.get("/callback?error=access_denied", None).await;
    assert_eq!(headers[header::LOCATION], "/#error=authorization_failed");

    let (_, headers, _) = app.get("/callback?code=abc&state=unknown", None).await;
    assert_eq!(headers[header::LOCATION], "/#error=state_mismatch");
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new().await;
    let session = app.session("valid", 3600).await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(SESSION_HEADER, &session)
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = app.send(request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.sessions.get(&session).await.is_none());
}
