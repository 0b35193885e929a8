//! Terms-and-conditions table extraction
//!
//! A disclosure page renders as two stacked tables: interest rates and
//! interest charges on top, fees below, with the fees table subdivided into
//! annual, transaction, and penalty sections. Given the page's visible text
//! as one flat string, this module segments at the dividers, locates each
//! section's attribute headers, and carves out the raw term each one owns.

use crate::error::Result;
use crate::matcher::locate_all;
use crate::schema::{AliasEntries, AliasTable, Attribute, DividerSet};
use crate::segment::segment;
use crate::slicer::{drop_after_termination, excise_rate_disclaimer, slice};

/// Extract every attribute's raw term from a disclosure page.
///
/// Fails as a whole when any of the three section dividers cannot be found;
/// partial section inference would attribute text to the wrong cells.
/// Attributes whose alias is absent from their section are simply missing
/// from the result.
pub fn extract_terms(
    aliases: &AliasTable,
    dividers: &DividerSet,
    text: &str,
) -> Result<Vec<(Attribute, String)>> {
    let groups = [
        dividers.fees.as_slice(),
        dividers.transaction.as_slice(),
        dividers.penalty.as_slice(),
    ];
    let bounds = segment(text, &groups)?;

    // everything before the fees divider is the APR table
    let upper_table = &text[..bounds[0].start];
    let annual_fees = &text[bounds[0].start..bounds[0].end];
    let transaction_fees = &text[bounds[1].start..bounds[1].end];
    let penalty_fees = &text[bounds[2].start..bounds[2].end];

    let mut terms = Vec::new();
    for (entries, region) in [
        (&aliases.upper_table, upper_table),
        (&aliases.annual_fees, annual_fees),
        (&aliases.transaction_fees, transaction_fees),
        (&aliases.penalty_fees, penalty_fees),
    ] {
        terms.extend(collect_section(entries, region));
    }

    log::debug!("extracted {} raw terms", terms.len());
    Ok(terms)
}

/// Locate the section's attribute headers, cut the results off at any
/// termination marker, carve the owned substrings, and trim the trailing
/// variable-rate disclaimer from each.
fn collect_section(entries: &AliasEntries, region: &str) -> Vec<(Attribute, String)> {
    let hits = drop_after_termination(locate_all(entries, region));
    slice(&hits, region)
        .into_iter()
        .map(|(attribute, term)| (attribute, excise_rate_disclaimer(&term).to_string()))
        .collect()
}
