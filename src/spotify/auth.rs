use chrono::Utc;
use reqwest::Url;

use super::{SpotifyClient, SpotifyError};
use crate::types::{Token, TokenResponse};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

impl SpotifyClient {
    /// Builds the authorization URL the user is sent to for consent.
    ///
    /// The URL carries the `state` that ties the callback to its pending login
    /// and the PKCE `code_challenge` derived from that login's verifier. All
    /// parameters are query-encoded.
    pub fn authorize_url(&self, state: &str, code_challenge: &str) -> String {
        let settings = self.settings();
        let params = [
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("scope", settings.scope.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("state", state),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
        ];

        match Url::parse_with_params(&settings.auth_url, &params) {
            Ok(url) => url.to_string(),
            // the auth URL comes from configuration; keep the raw form so the
            // caller sees what was configured
            Err(_) => settings.auth_url.clone(),
        }
    }

    /// Exchanges an authorization code for a token.
    ///
    /// When a client secret is configured the request authenticates with HTTP
    /// Basic credentials; otherwise the client id travels in the form and the
    /// PKCE verifier alone proves the caller started the flow.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Token, SpotifyError> {
        let redirect_uri = self.settings().redirect_uri.as_str();
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
        ];

        let token = self.token_request(&form).await?;
        Ok(token.into_token(None))
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify may or may not rotate the refresh token; when the response has
    /// none, the one passed in is kept.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let token = self.token_request(&form).await?;
        Ok(token.into_token(Some(refresh_token)))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
        let settings = self.settings();
        let mut fields: Vec<(String, String)> = form
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if settings.client_secret.is_none() {
            fields.push(("client_id".to_string(), settings.client_id.clone()));
        }

        let response = self
            .send(|| {
                let request = self.http.post(&settings.token_url).form(&fields);
                match &settings.client_secret {
                    Some(secret) => request.basic_auth(&settings.client_id, Some(secret)),
                    None => request,
                }
            })
            .await?;

        Ok(response.json::<TokenResponse>().await?)
    }
}

impl TokenResponse {
    pub fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
            obtained_at: Utc::now().timestamp().max(0) as u64,
        }
    }
}
