//! Divider-based page segmentation
//!
//! A disclosure page is one flat string; divider literals split it into the
//! ordered sections the attribute tables live in. Every divider group must
//! match or the whole record fails — partial section inference produces
//! garbage attributions, so there is none.

use crate::error::{Result, SchumerError};
use crate::matcher::find_ignore_ascii_case;

/// Byte range of one section. Boundaries are non-overlapping and
/// monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBoundary {
    pub start: usize,
    pub end: usize,
}

/// Split `text` at each divider group, in order.
///
/// Each group is a list of alternative spellings tried in order; the first
/// spelling found in the remaining text (at or after the previous divider)
/// wins. Each divider marks the start of a region that runs to the next
/// divider or the end of text. Text before the first divider belongs to the
/// preceding logical section and is the caller's to keep or drop.
///
/// Returns one boundary per group, or `DividerNotFound` naming the group's
/// primary spelling if any group fails to match.
pub fn segment(text: &str, divider_groups: &[&[String]]) -> Result<Vec<SectionBoundary>> {
    let mut starts = Vec::with_capacity(divider_groups.len());
    let mut cursor = 0usize;

    for group in divider_groups {
        let found = group
            .iter()
            .find_map(|spelling| find_ignore_ascii_case(&text[cursor..], spelling));
        let relative = found.ok_or_else(|| {
            SchumerError::DividerNotFound(group.first().cloned().unwrap_or_default())
        })?;
        cursor += relative;
        starts.push(cursor);
    }

    let boundaries = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| SectionBoundary {
            start,
            end: starts.get(i + 1).copied().unwrap_or(text.len()),
        })
        .collect();

    Ok(boundaries)
}
