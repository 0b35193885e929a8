//! Term carving within a section
//!
//! Once the attribute headers in a section are located, each attribute owns
//! the text between the end of its own header and the start of the next one
//! (or the end of the section for the last header).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matcher::AttributeHit;
use crate::schema::Attribute;

// Variable-rate disclaimer that trails almost every APR cell: a capitalized
// clause mentioning APR and the Prime Rate, ending in sentence punctuation.
static RATE_DISCLAIMER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z][^.!?]*APR[^.!?]*Prime Rate[^.!?]*[.!?]")
        .expect("Invalid rate disclaimer pattern")
});

/// Drop every hit positioned after a termination marker.
///
/// The termination marker demarcates the end of the structured table and the
/// start of free-form legal text; anything matched beyond it would attribute
/// legal prose to a table cell. The marker's own hit is kept so the table
/// still ends at the right place.
pub fn drop_after_termination(hits: Vec<AttributeHit>) -> Vec<AttributeHit> {
    let termination_offset = hits
        .iter()
        .find(|h| h.attribute == Attribute::Termination)
        .map(|h| h.offset);

    match termination_offset {
        Some(end) => hits.into_iter().filter(|h| h.offset <= end).collect(),
        None => hits,
    }
}

/// Carve out the raw substring owned by each located attribute.
///
/// `hits` must be sorted ascending by offset, as `locate_all` returns them.
pub fn slice(hits: &[AttributeHit], text: &str) -> Vec<(Attribute, String)> {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let start = hit.offset + hit.length;
            let end = hits.get(i + 1).map(|next| next.offset).unwrap_or(text.len());
            (hit.attribute, text[start..end].to_string())
        })
        .collect()
}

/// Cut a term short at the first variable-rate disclaimer sentence.
pub fn excise_rate_disclaimer(text: &str) -> &str {
    match RATE_DISCLAIMER_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}
