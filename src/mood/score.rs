use serde::{Deserialize, Serialize};

use super::profile::{Feature, MoodProfile};

/// The audio features the engine scores for a single track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub tempo: f64,
}

impl AudioFeatures {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Valence => self.valence,
            Feature::Energy => self.energy,
            Feature::Danceability => self.danceability,
            Feature::Tempo => self.tempo,
        }
    }
}

/// Scores one feature record against a profile, in `[0, 1]`.
///
/// Every constrained feature adds its weight to the denominator, whether or
/// not the value falls inside its range. Values inside a range contribute
/// their closeness to the range midpoint times the weight; values outside
/// contribute nothing. A profile without ranges scores `0.0`.
pub fn score_features(features: &AudioFeatures, profile: &MoodProfile) -> f64 {
    let mut score = 0.0;
    let mut total_weight = 0.0;

    for (&feature, range) in &profile.ranges {
        let weight = profile.weight(feature);
        total_weight += weight;

        if let Some(closeness) = range.closeness(features.value(feature)) {
            score += closeness * weight;
        }
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// Mean score over the tracks that have features, `0.0` when none do.
pub fn score_aggregate(features: &[Option<AudioFeatures>], profile: &MoodProfile) -> f64 {
    let scores: Vec<f64> = features
        .iter()
        .flatten()
        .map(|f| score_features(f, profile))
        .collect();

    if scores.is_empty() {
        return 0.0;
    }

    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Per-feature means over a set of tracks, reported next to an album score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAverages {
    pub avg_valence: f64,
    pub avg_energy: f64,
    pub avg_danceability: f64,
    pub avg_tempo: f64,
}

impl FeatureAverages {
    pub fn from_features(features: &[AudioFeatures]) -> Option<Self> {
        if features.is_empty() {
            return None;
        }

        let n = features.len() as f64;
        let mean = |feature: Feature| features.iter().map(|f| f.value(feature)).sum::<f64>() / n;

        Some(Self {
            avg_valence: mean(Feature::Valence),
            avg_energy: mean(Feature::Energy),
            avg_danceability: mean(Feature::Danceability),
            avg_tempo: mean(Feature::Tempo),
        })
    }
}
