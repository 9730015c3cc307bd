use serde::Serialize;

/// An item paired with its mood score.
///
/// Serializes as the item's own fields plus `moodScore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub mood_score: f64,
}

impl<T> ScoredItem<T> {
    pub fn new(item: T, mood_score: f64) -> Self {
        Self { item, mood_score }
    }
}

/// Keeps items scoring strictly above `min_score`, best first.
///
/// The sort is stable, so equally scored items keep their input order.
pub fn filter_and_sort<T>(mut items: Vec<ScoredItem<T>>, min_score: f64) -> Vec<ScoredItem<T>> {
    items.retain(|i| i.mood_score > min_score);
    items.sort_by(|a, b| b.mood_score.total_cmp(&a.mood_score));
    items
}

/// [`filter_and_sort`], truncated to the first `top_n` items.
pub fn rank_and_filter<T>(
    items: Vec<ScoredItem<T>>,
    min_score: f64,
    top_n: usize,
) -> Vec<ScoredItem<T>> {
    let mut ranked = filter_and_sort(items, min_score);
    ranked.truncate(top_n);
    ranked
}
