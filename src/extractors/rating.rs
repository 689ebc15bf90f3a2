use serde_json::Value;
use tracing::{debug, warn};

const REVIEW_COUNT_KEY: &str = "review_count";
const MAX_RATING: f64 = 10.0;

/// Mean of the category ratings, excluding the review count.
///
/// Values outside `[0, 10]` and non-numeric entries are skipped. The mean is
/// rounded to two decimals, half away from zero.
pub fn average_rating(rating: Option<&Value>) -> f64 {
    let Some(Value::Object(entries)) = rating else {
        warn!("rating data is missing or not a mapping");
        return 0.0;
    };

    let ratings: Vec<f64> = entries
        .iter()
        .filter(|(key, _)| key.as_str() != REVIEW_COUNT_KEY)
        .filter_map(|(key, value)| {
            let score = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if score.is_none() {
                debug!(key = %key, "skipping non-numeric rating value");
            }
            score
        })
        .filter(|score| (0.0..=MAX_RATING).contains(score))
        .collect();

    if ratings.is_empty() {
        warn!("no valid ratings found in rating data");
        return 0.0;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    round_2(mean)
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
