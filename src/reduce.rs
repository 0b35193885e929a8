//! Second-pass numeric reduction
//!
//! Normalized values are human-readable strings; cross-card comparison
//! needs one number per attribute. Percent-shaped values reduce to their
//! maximum percentage (worst-case framing), dollar values to a float, and
//! the credit score range to its low/high pair.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{Attribute, AttributeKind};

/// Returned for a non-empty percent value with no parseable percentage
pub const NO_PERCENT_SENTINEL: f64 = -1.0;

static PCT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d.]+)%").expect("regex"));
static THREE_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}").expect("regex"));

/// Largest percentage in a value like "12%", "12% to 15%", or
/// "either 3% of each transfer  or $5, whichever is greater".
///
/// Returns the sentinel when no percentage is present or any occurrence
/// fails to parse.
pub fn find_max_percentage(value: &str) -> f64 {
    let mut max: Option<f64> = None;
    for caps in PCT_NUMBER_RE.captures_iter(value) {
        match caps[1].parse::<f64>() {
            Ok(n) => max = Some(max.map_or(n, |m: f64| m.max(n))),
            Err(_) => {
                log::warn!("unparseable percentage token in {:?}", value);
                return NO_PERCENT_SENTINEL;
            }
        }
    }
    max.unwrap_or(NO_PERCENT_SENTINEL)
}

/// Reduce one normalized value to its comparable number.
///
/// Empty values reduce to `None`; so do dollar values that fail to parse
/// (an upstream extraction error already holds the field's value slot).
pub fn reduce_single(attribute: Attribute, value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    match attribute.kind() {
        AttributeKind::Percent | AttributeKind::WeirdFee => Some(find_max_percentage(value)),
        AttributeKind::Money => {
            let parsed = value
                .strip_prefix('$')
                .and_then(|amount| amount.parse::<f64>().ok());
            if parsed.is_none() {
                log::warn!(
                    "dollar value for {} did not parse: {:?}",
                    attribute.name(),
                    value
                );
            }
            parsed
        }
        _ => None,
    }
}

/// Split an already-normalized "LOW to HIGH" credit score value into its
/// bounds. No low < high re-validation; whatever was parsed passes through.
pub fn reduce_scores(value: &str) -> Option<(u32, u32)> {
    if value.is_empty() {
        return None;
    }
    let mut tokens = THREE_DIGIT_RE.find_iter(value);
    let low = tokens.next()?.as_str().parse().ok()?;
    let high = tokens.next()?.as_str().parse().ok()?;
    Some((low, high))
}
