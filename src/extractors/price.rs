use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

fn numeric_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d,]+\.?\d*").expect("static price pattern"))
}

/// First numeric run of a currency-formatted value, e.g. `"S$1,234.50"` -> `1234.5`.
///
/// Thousands separators and currency symbols are dropped. Returns `0.0` when
/// there is no usable number.
pub fn numeric_price(value: &Value) -> f64 {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return 0.0,
    };

    let Some(found) = numeric_run().find(&raw) else {
        return 0.0;
    };

    let digits = found.as_str().replace(',', "");
    match digits.parse::<f64>() {
        Ok(price) if price.is_finite() => price,
        _ => {
            warn!(price = %raw, "failed to convert price to a number");
            0.0
        }
    }
}

/// Nightly price from the `price.main` section, preferring a positive
/// discounted price over the regular one.
pub fn extract_price(payload: &Value) -> f64 {
    let main = payload.get("price").and_then(|p| p.get("main"));

    let Some(main) = main.filter(|m| m.is_object()) else {
        warn!("no price section in listing data");
        return 0.0;
    };

    let discounted = main.get("discountedPrice").map_or(0.0, numeric_price);
    let regular = main.get("price").map_or(0.0, numeric_price);

    let price = if discounted > 0.0 { discounted } else { regular };
    if price == 0.0 {
        warn!("no valid price found in listing data");
    }
    price
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn prefers_positive_discounted_price() {
        let payload = json!({"price": {"main": {"discountedPrice": "$80", "price": "$100"}}});
        assert_eq!(extract_price(&payload), 80.0);
    }

    #[rstest]
    #[case(json!({"price": {"main": {"discountedPrice": "", "price": "$100"}}}), 100.0)]
    #[case(json!({"price": {"main": {"discountedPrice": "$0", "price": "$100"}}}), 100.0)]
    #[case(json!({"price": {"main": {"discountedPrice": {}, "price": "S$1,250.75"}}}), 1250.75)]
    #[case(json!({"price": {"main": {"price": 95}}}), 95.0)]
    #[case(json!({"price": {"main": {}}}), 0.0)]
    #[case(json!({"price": "free"}), 0.0)]
    #[case(json!({}), 0.0)]
    fn falls_back_to_regular_price(#[case] payload: Value, #[case] expected: f64) {
        assert_eq!(extract_price(&payload), expected);
    }

    #[rstest]
    #[case(json!("$1,234"), 1234.0)]
    #[case(json!("€ 99.90 per night"), 99.9)]
    #[case(json!("SGD 45 (was 60)"), 45.0)]
    #[case(json!("no price"), 0.0)]
    #[case(json!(","), 0.0)]
    #[case(json!(null), 0.0)]
    fn numeric_run_is_extracted(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(numeric_price(&value), expected);
    }
}
