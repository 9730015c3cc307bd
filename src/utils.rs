use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value tying an OAuth callback to the login that started it.
pub fn generate_state() -> String {
    random_alphanumeric(16)
}

pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

/// Splits a comma separated id list, dropping blanks and surrounding spaces.
pub fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats a `[0, 1]` score as a whole percentage, e.g. `0.876` → `"88%"`.
pub fn format_score(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}
