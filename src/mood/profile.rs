use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four audio feature dimensions a mood can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Valence,
    Energy,
    Danceability,
    Tempo,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Valence,
        Feature::Energy,
        Feature::Danceability,
        Feature::Tempo,
    ];

    /// Weight applied when a profile constrains a feature without weighting it.
    ///
    /// Existing presets were tuned against these values, so they must not drift.
    pub fn default_weight(self) -> f64 {
        match self {
            Feature::Valence | Feature::Energy => 0.5,
            Feature::Danceability | Feature::Tempo => 0.3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::Valence => "valence",
            Feature::Energy => "energy",
            Feature::Danceability => "danceability",
            Feature::Tempo => "tempo",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive `[min, max]` bounds for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "range minimum {min} exceeds maximum {max}");
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// How close `value` sits to the middle of the range.
    ///
    /// Returns `None` when the value falls outside the range. Inside it, the
    /// result is `1.0` at the midpoint and falls linearly to `0.0` at either
    /// edge. A single-point range (`min == max`) matches only that exact value,
    /// with closeness `1.0`.
    pub fn closeness(&self, value: f64) -> Option<f64> {
        if !self.contains(value) {
            return None;
        }

        let half = self.half_width();
        if half == 0.0 {
            return Some(1.0);
        }

        let distance = (value - self.midpoint()).abs();
        Some((1.0 - distance / half).clamp(0.0, 1.0))
    }
}

/// Ranges and weights describing what counts as a match for a mood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodProfile {
    pub ranges: BTreeMap<Feature, FeatureRange>,
    pub weights: BTreeMap<Feature, f64>,
}

impl MoodProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, feature: Feature, min: f64, max: f64) -> Self {
        self.ranges.insert(feature, FeatureRange::new(min, max));
        self
    }

    pub fn with_weight(mut self, feature: Feature, weight: f64) -> Self {
        self.weights.insert(feature, weight);
        self
    }

    pub fn range(&self, feature: Feature) -> Option<&FeatureRange> {
        self.ranges.get(&feature)
    }

    /// Weight for `feature`, falling back to [`Feature::default_weight`].
    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights
            .get(&feature)
            .copied()
            .unwrap_or_else(|| feature.default_weight())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoodError {
    #[error("Invalid mood '{0}'. Valid moods: happy, sad, energetic, chill")]
    Unknown(String),
}

/// The fixed set of moods the engine ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Chill,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Energetic, Mood::Chill];

    pub fn name(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Chill => "chill",
        }
    }

    /// The preset profile for this mood. This table is the only mood
    /// definition in the crate; everything else asks it.
    pub fn profile(self) -> MoodProfile {
        use Feature::*;

        match self {
            Mood::Happy => MoodProfile::new()
                .with_range(Valence, 0.7, 1.0)
                .with_range(Energy, 0.5, 1.0)
                .with_weight(Valence, 0.6)
                .with_weight(Energy, 0.4),
            Mood::Sad => MoodProfile::new()
                .with_range(Valence, 0.0, 0.3)
                .with_range(Energy, 0.0, 0.5)
                .with_weight(Valence, 0.7)
                .with_weight(Energy, 0.3),
            Mood::Energetic => MoodProfile::new()
                .with_range(Valence, 0.4, 1.0)
                .with_range(Energy, 0.7, 1.0)
                .with_range(Danceability, 0.5, 1.0)
                .with_weight(Energy, 0.5)
                .with_weight(Danceability, 0.3)
                .with_weight(Valence, 0.2),
            Mood::Chill => MoodProfile::new()
                .with_range(Valence, 0.3, 0.7)
                .with_range(Energy, 0.2, 0.5)
                .with_range(Tempo, 60.0, 120.0)
                .with_weight(Energy, 0.4)
                .with_weight(Valence, 0.3)
                .with_weight(Tempo, 0.3),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mood {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MoodError::Unknown(s.to_string()))
    }
}
