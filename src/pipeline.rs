//! Card processing pipeline
//!
//! Three stages run strictly in sequence per card: scrape raw terms out of
//! the source text, clean each term into a canonical value, reduce each
//! value to a comparable number. Every stage consumes the record and
//! returns a new one; records are never shared, so batches are a sequence
//! of independent transformations and a failed card never takes down its
//! neighbors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregator::extract_review;
use crate::extract::extract_terms;
use crate::normalize::normalize_value;
use crate::record::CardRecord;
use crate::reduce::{reduce_scores, reduce_single};
use crate::schema::{AggMarkers, AliasTable, DividerSet, NumberShape};

/// Filled in where no lookup entry resolves a short card name
pub const SHORT_NAME_PLACEHOLDER: &str = "--- MANUALLY FILL IN THE SHORT NAME ---";
/// Filled in where no lookup entry resolves issuer/processor/category
pub const META_PLACEHOLDER: &str = "---MANUALLY FILL IN---";

/// How the terms-and-conditions page was rendered upstream.
///
/// The fetch layer has already flattened the page to visible text either
/// way; the kind is carried for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Dynamic,
    #[default]
    Static,
}

/// One card's inputs: links, pre-fetched visible text, and the card name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSource {
    pub full_card_name: String,
    #[serde(default)]
    pub toc_link: String,
    #[serde(default)]
    pub offer_link: String,
    #[serde(default)]
    pub agg_link: String,
    #[serde(default)]
    pub toc_kind: SourceKind,
    /// Visible text of the terms-and-conditions page, if fetched
    #[serde(default)]
    pub toc_text: Option<String>,
    /// Visible text of the review aggregator page, if fetched
    #[serde(default)]
    pub agg_text: Option<String>,
}

/// Manually curated issuer metadata for one card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardMeta {
    pub issuer: String,
    pub processor: String,
    pub category: String,
}

/// The configured pipeline. All schemas are immutable configuration passed
/// in at construction; there is no process-wide state.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub aliases: AliasTable,
    pub dividers: DividerSet,
    pub markers: AggMarkers,
    /// Lowercased full card name -> short display name
    pub short_names: HashMap<String, String>,
    /// Lowercased full card name -> issuer/processor/category
    pub card_meta: HashMap<String, CardMeta>,
}

impl Pipeline {
    /// Pipeline with the production alias tables and divider sets and no
    /// lookup tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run all three stages on one card.
    pub fn process(&self, source: &CardSource) -> CardRecord {
        let record = self.scrape(source);
        let record = self.clean(record);
        self.reduce(record)
    }

    /// Run the full pipeline over a batch. One record per source, in order;
    /// failures are per-record and never abort the batch.
    pub fn process_batch(&self, sources: &[CardSource]) -> Vec<CardRecord> {
        sources.iter().map(|source| self.process(source)).collect()
    }

    /// Stage 1: populate a fresh record with raw terms and metadata.
    pub fn scrape(&self, source: &CardSource) -> CardRecord {
        let name = &source.full_card_name;
        log::info!("scraping {} ({:?} terms page)", name, source.toc_kind);

        let mut record = CardRecord::new(name);
        record.toc_link = source.toc_link.clone();
        record.offer_link = source.offer_link.clone();
        record.agg_link = source.agg_link.clone();

        let key = name.to_lowercase();
        record.short_card_name = self
            .short_names
            .get(&key)
            .cloned()
            .unwrap_or_else(|| SHORT_NAME_PLACEHOLDER.to_string());
        match self.card_meta.get(&key) {
            Some(meta) => {
                record.issuer = meta.issuer.clone();
                record.processor = meta.processor.clone();
                record.category = meta.category.clone();
            }
            None => {
                record.issuer = META_PLACEHOLDER.to_string();
                record.processor = META_PLACEHOLDER.to_string();
                record.category = META_PLACEHOLDER.to_string();
            }
        }

        if let Some(text) = &source.toc_text {
            match extract_terms(&self.aliases, &self.dividers, text) {
                Ok(terms) => {
                    for (attribute, term) in terms {
                        record.set_term(attribute, term);
                    }
                }
                Err(e) => {
                    // table attributes stay empty; everything else stands
                    log::warn!("terms page for {} not segmented: {}", name, e);
                    record.scraped_ok = false;
                }
            }
        }

        if let Some(text) = &source.agg_text {
            match extract_review(&self.aliases.aggregator, &self.markers, text) {
                Ok(review) => {
                    for (attribute, term) in review.terms {
                        record.set_term(attribute, term);
                    }
                    record.trademark_card_name = review.trademark_name;
                }
                Err(e) => {
                    log::warn!("review page for {} not recognized: {}", name, e);
                }
            }
        }

        record
    }

    /// Stage 2: normalize every term into its canonical value.
    pub fn clean(&self, record: CardRecord) -> CardRecord {
        log::info!("cleaning terms for {}", record.full_card_name);
        let mut record = record;
        for (attribute, field) in record.fields_mut() {
            field.value = normalize_value(attribute, &field.term);
        }
        record
    }

    /// Stage 3: reduce values to comparable numbers where the attribute
    /// carries one.
    pub fn reduce(&self, record: CardRecord) -> CardRecord {
        let mut record = record;
        for (attribute, field) in record.fields_mut() {
            match attribute.number_shape() {
                NumberShape::None => {}
                NumberShape::Single => {
                    field.number = reduce_single(attribute, &field.value);
                }
                NumberShape::ScorePair => {
                    if let Some((low, high)) = reduce_scores(&field.value) {
                        field.low_number = Some(low);
                        field.high_number = Some(high);
                    }
                }
            }
        }
        record
    }
}
