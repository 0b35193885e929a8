//! Alias search over page text
//!
//! An attribute's section header can be typeset many different ways; each
//! attribute carries an ordered list of candidate phrasings. Matching tries
//! the phrasings in list order and stops at the first one found anywhere in
//! the text — list order is precedence and deliberately overrides textual
//! position, so a more specific phrasing beats an earlier-occurring vague
//! one.

use crate::schema::{AliasEntries, Attribute};

/// A located alias: byte offset of the match and length of the literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasHit {
    pub offset: usize,
    pub length: usize,
}

/// A located attribute header within a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeHit {
    pub attribute: Attribute,
    pub offset: usize,
    pub length: usize,
}

/// ASCII-case-insensitive substring search returning a byte offset.
///
/// Offsets must index into the original text, so lowercasing copies are out;
/// the needle literals are ASCII.
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Find the first alias, by list order, that occurs anywhere in `text`.
///
/// Returns the match for that alias, not the alias that occurs earliest in
/// the text.
pub fn find_first(aliases: &[String], text: &str) -> Option<AliasHit> {
    for alias in aliases {
        if let Some(offset) = find_ignore_ascii_case(text, alias) {
            return Some(AliasHit {
                offset,
                length: alias.len(),
            });
        }
    }
    None
}

/// Locate every attribute whose alias appears in `text`, sorted ascending
/// by offset. Attributes with no match are simply omitted.
pub fn locate_all(entries: &AliasEntries, text: &str) -> Vec<AttributeHit> {
    let mut hits: Vec<AttributeHit> = entries
        .iter()
        .filter_map(|(attribute, aliases)| {
            find_first(aliases, text).map(|hit| AttributeHit {
                attribute: *attribute,
                offset: hit.offset,
                length: hit.length,
            })
        })
        .collect();
    hits.sort_by_key(|h| h.offset);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_order_beats_text_position() {
        // "B" is first in the list, so its match wins even though "A"
        // occurs earlier in the text
        let hit = find_first(&aliases(&["B", "A"]), "A then B").unwrap();
        assert_eq!(hit.offset, 7);
        assert_eq!(hit.length, 1);
    }

    #[test]
    fn test_case_insensitive() {
        let hit = find_first(&aliases(&["Annual Fee"]), "blah ANNUAL FEE $95").unwrap();
        assert_eq!(hit.offset, 5);
        assert_eq!(hit.length, "Annual Fee".len());
    }

    #[test]
    fn test_not_found() {
        assert!(find_first(&aliases(&["Penalty APR"]), "nothing here").is_none());
    }

    #[test]
    fn test_empty_alias_never_matches() {
        assert!(find_first(&aliases(&[""]), "some text").is_none());
    }

    #[test]
    fn test_locate_all_sorted_by_offset() {
        let entries: AliasEntries = vec![
            (Attribute::CashAdvanceApr, aliases(&["Cash Advances"])),
            (Attribute::PurchaseApr, aliases(&["Purchases"])),
        ];
        let hits = locate_all(&entries, "APR for Purchases 10% Cash Advances 25%");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].attribute, Attribute::PurchaseApr);
        assert_eq!(hits[1].attribute, Attribute::CashAdvanceApr);
        assert!(hits[0].offset < hits[1].offset);
    }

    #[test]
    fn test_locate_all_omits_missing() {
        let entries: AliasEntries = vec![
            (Attribute::PurchaseApr, aliases(&["Purchases"])),
            (Attribute::PenaltyApr, aliases(&["Penalty APR"])),
        ];
        let hits = locate_all(&entries, "APR for Purchases 10%");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].attribute, Attribute::PurchaseApr);
    }
}
