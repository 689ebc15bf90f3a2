//! Listing identity and stay window from a source URL.
//!
//! Expected shape: `https://<host>/rooms/<digits>?check_in=<date>&check_out=<date>&adults=<n>`
//! with the query parameters in any order.

use chrono::NaiveDate;
use tracing::debug;
use url::Url;

use crate::error::UrlError;
use crate::models::StayQuery;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a listing URL into its identity and stay window.
pub fn parse_listing_url(link: &str) -> Result<StayQuery, UrlError> {
    let parsed = Url::parse(link.trim())
        .map_err(|e| UrlError::InvalidFormat(format!("not a URL ({e})")))?;

    if parsed.scheme() != "https" {
        return Err(UrlError::InvalidFormat(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::InvalidFormat("missing host".into()))?;
    if !is_listing_host(host) {
        return Err(UrlError::InvalidFormat(format!("unexpected host '{host}'")));
    }

    let listing_id = room_id(&parsed)?;

    let check_in_raw = query_param(&parsed, "check_in")
        .ok_or_else(|| UrlError::InvalidFormat("check_in parameter not found".into()))?;
    let check_out_raw = query_param(&parsed, "check_out")
        .ok_or_else(|| UrlError::InvalidFormat("check_out parameter not found".into()))?;

    let check_in = parse_date(&check_in_raw)?;
    let check_out = parse_date(&check_out_raw)?;

    if check_out <= check_in {
        return Err(UrlError::InvalidDateOrder {
            check_in: check_in_raw,
            check_out: check_out_raw,
        });
    }

    let adults = match query_param(&parsed, "adults") {
        Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
            debug!(adults = %raw, "unparseable adults parameter, defaulting to 1");
            1
        }),
        None => 1,
    };

    Ok(StayQuery {
        listing_id,
        stay_nights: (check_out - check_in).num_days(),
        check_in,
        check_out,
        adults,
    })
}

/// Boolean wrapper around [`parse_listing_url`].
pub fn is_valid_listing_url(link: &str) -> bool {
    parse_listing_url(link).is_ok()
}

/// `airbnb.com`, `www.airbnb.com`, `airbnb.com.sg`, `www.airbnb.co.uk`, ...
fn is_listing_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.strip_prefix("airbnb.")
        .is_some_and(|tld| !tld.is_empty() && tld.split('.').all(|label| !label.is_empty()))
}

fn room_id(parsed: &Url) -> Result<i64, UrlError> {
    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| UrlError::InvalidFormat("missing path".into()))?;

    if segments.next() != Some("rooms") {
        return Err(UrlError::InvalidFormat("room ID not found".into()));
    }

    let raw = segments.next().unwrap_or("");
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UrlError::InvalidFormat(format!("room ID '{raw}' is not numeric")));
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(UrlError::InvalidFormat(format!("room ID '{raw}' is out of range"))),
    }
}

fn query_param(parsed: &Url, name: &str) -> Option<String> {
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn parse_date(raw: &str) -> Result<NaiveDate, UrlError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| UrlError::InvalidFormat(format!("invalid date '{raw}': {e}")))
}
