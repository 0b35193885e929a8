//! Review aggregator page extraction
//!
//! The review site publishes two layouts of the same card page: one puts the
//! recommended credit score at the top on its own, the other lists it among
//! the card detail headers. Which layout applies is decided by where the
//! score marker sits relative to the card details header; the blob is then
//! condensed to the region between the layout's start and end markers before
//! alias slicing. Header literals carry a leading underscore stamped onto
//! heading tags by the fetch layer.

use crate::error::{Result, SchumerError};
use crate::matcher::{find_ignore_ascii_case, locate_all};
use crate::schema::{AggMarkers, AliasEntries, Attribute};
use crate::slicer::slice;

/// Everything pulled off one review page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewExtract {
    /// Raw term per review attribute, in page order
    pub terms: Vec<(Attribute, String)>,
    /// Trademark card name shown in the page header, if recognizable
    pub trademark_name: String,
}

/// Extract the review attributes and the trademark card name from a review
/// page's visible text.
pub fn extract_review(
    aliases: &AliasEntries,
    markers: &AggMarkers,
    text: &str,
) -> Result<ReviewExtract> {
    let details_at = find_ignore_ascii_case(text, &markers.details_header)
        .ok_or_else(|| SchumerError::MarkerNotFound(markers.details_header.clone()))?;
    let score_at = find_ignore_ascii_case(text, &markers.score_header)
        .ok_or_else(|| SchumerError::MarkerNotFound(markers.score_header.clone()))?;

    // score above the details header means the score-on-top layout
    let (start, end_marker) = if score_at < details_at {
        (score_at, &markers.score_layout_end)
    } else {
        (details_at, &markers.details_layout_end)
    };
    let end = find_ignore_ascii_case(&text[start..], end_marker)
        .map(|i| start + i)
        .ok_or_else(|| SchumerError::MarkerNotFound(end_marker.clone()))?;
    let block = &text[start..end];

    let hits = locate_all(aliases, block);
    let terms = slice(&hits, block);
    log::debug!("extracted {} review terms", terms.len());

    Ok(ReviewExtract {
        terms,
        trademark_name: trademark_name(markers, text),
    })
}

// The trademark card name sits between the advertiser disclosure and the
// apply button; absent or out-of-order markers leave it for manual fill-in.
fn trademark_name(markers: &AggMarkers, text: &str) -> String {
    let start = match find_ignore_ascii_case(text, &markers.trademark_start) {
        Some(i) => i + markers.trademark_start.len(),
        None => return String::new(),
    };
    match find_ignore_ascii_case(&text[start..], &markers.trademark_end) {
        Some(i) => text[start..start + i].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AliasTable;

    const DETAILS_FIRST_PAGE: &str = "\
Advertiser Disclosure
Gold Rewards Card
Apply Now
_Card details
Earn 2x points on restaurants worldwide.
_Pros
No annual fee
_Cons
High APR
_Recommended credit score
690850
_Bonus offer
60,000 points
_Annual fee
$0
See if you may qualify
fine print follows";

    const SCORE_FIRST_PAGE: &str = "\
Advertiser Disclosure
Plain Cash Card
Apply Now
Recommended credit score
670700
_Card details
Flat 1.5% cash back on everything.
_Pros
Simple rewards
See if you may qualify
NerdWallet reviews are the result of independent research
footer";

    fn review_aliases() -> AliasEntries {
        AliasTable::default().aggregator
    }

    #[test]
    fn test_details_first_layout() {
        let review =
            extract_review(&review_aliases(), &AggMarkers::default(), DETAILS_FIRST_PAGE)
                .unwrap();
        let get = |attr: Attribute| {
            review
                .terms
                .iter()
                .find(|(a, _)| *a == attr)
                .map(|(_, t)| t.as_str())
        };
        assert_eq!(
            get(Attribute::OfferDetails),
            Some("\nEarn 2x points on restaurants worldwide.\n")
        );
        assert_eq!(get(Attribute::Pros), Some("\nNo annual fee\n"));
        assert_eq!(get(Attribute::CreditScore), Some("\n690850\n"));
        assert_eq!(get(Attribute::AnnualFeeCheck), Some("\n$0\n"));
        // the end marker bounds the final term
        assert!(!get(Attribute::AnnualFeeCheck).unwrap().contains("qualify"));
        assert_eq!(review.trademark_name, "\nGold Rewards Card\n");
    }

    #[test]
    fn test_score_first_layout() {
        let review =
            extract_review(&review_aliases(), &AggMarkers::default(), SCORE_FIRST_PAGE).unwrap();
        let get = |attr: Attribute| {
            review
                .terms
                .iter()
                .find(|(a, _)| *a == attr)
                .map(|(_, t)| t.as_str())
        };
        assert_eq!(
            get(Attribute::OfferDetails),
            Some("\nFlat 1.5% cash back on everything.\n")
        );
        assert!(get(Attribute::Pros).is_some());
        // this layout's score header has no underscore, so the score term
        // is not captured by the header aliases
        assert_eq!(get(Attribute::CreditScore), None);
        assert_eq!(review.trademark_name, "\nPlain Cash Card\n");
    }

    #[test]
    fn test_missing_marker_is_an_error() {
        let err = extract_review(
            &review_aliases(),
            &AggMarkers::default(),
            "page without any known markers",
        )
        .unwrap_err();
        assert!(matches!(err, SchumerError::MarkerNotFound(_)));
    }
}
