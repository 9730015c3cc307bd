use axum::Json;

use crate::{mood::Mood, types::MoodDefinition};

/// Every mood the engine knows, with its ranges and weights.
pub async fn moods() -> Json<Vec<MoodDefinition>> {
    Json(
        Mood::ALL
            .into_iter()
            .map(|mood| MoodDefinition {
                mood,
                profile: mood.profile(),
            })
            .collect(),
    )
}
