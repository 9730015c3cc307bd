use crate::{
    info,
    mood::{AudioFeatures, Feature, Mood, score_features},
    success, utils, warning,
};

/// Scores a single set of audio features against `mood` and prints the
/// result along with how each feature fared.
pub async fn score(mood: Mood, features: AudioFeatures) {
    let profile = mood.profile();
    let score = score_features(&features, &profile);

    for feature in Feature::ALL {
        let value = features.value(feature);
        match profile.range(feature) {
            Some(range) if range.contains(value) => info!(
                "{} {:.2} is inside [{}, {}]",
                feature, value, range.min, range.max
            ),
            Some(range) => warning!(
                "{} {:.2} is outside [{}, {}]",
                feature, value, range.min, range.max
            ),
            None => info!("{} {:.2} is not part of the {} profile", feature, value, mood),
        }
    }

    success!("{} match: {}", mood, utils::format_score(score));
}
