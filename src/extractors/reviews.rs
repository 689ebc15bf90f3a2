use serde_json::Value;
use tracing::debug;

use super::{list, text_field};
use crate::models::ReviewEntry;

/// Upper bound on the number of reviews kept per listing
pub const MAX_REVIEWS: usize = 5;

/// First English reviews with a comment and an integer rating.
pub fn extract_reviews_summary(reviews: Option<&Value>) -> Vec<ReviewEntry> {
    list(reviews, "reviews")
        .iter()
        .filter(|review| is_english(review))
        .filter_map(|review| {
            let comment = text_field(review, "comments")?;
            let Some(rating) = review.get("rating").and_then(integer_rating) else {
                debug!(rating = ?review.get("rating"), "skipping review with invalid rating");
                return None;
            };
            Some(ReviewEntry {
                comment,
                rating,
                date: text_field(review, "localizedDate").unwrap_or_default(),
            })
        })
        .take(MAX_REVIEWS)
        .collect()
}

fn is_english(review: &Value) -> bool {
    review
        .get("language")
        .and_then(Value::as_str)
        .is_some_and(|language| language.trim().eq_ignore_ascii_case("en"))
}

/// Integers as-is, floats truncated toward zero, integer strings parsed.
fn integer_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
