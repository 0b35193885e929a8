use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{Attribute, AttributeKind};

/// Extraction state of a single structured attribute.
///
/// `term` is the raw substring carved out of the page, `value` the
/// normalized human-readable form, and the number fields the comparable
/// reduction. Each pipeline stage fills in the next field; a stage never
/// touches a field owned by an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub value: String,
    /// Comparable number, absent until reduction (or when the value is empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    /// Credit score bounds; only ever set for the credit score attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_number: Option<u32>,
}

/// Everything known about one card.
///
/// Scalar fields are supplied by the caller or filled from lookup tables;
/// the structured attributes are produced by the pipeline. The flattened
/// map serializes each attribute under its snake_case name in catalogue
/// order, so a row serializer can project columns without guessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub full_card_name: String,
    #[serde(default)]
    pub short_card_name: String,
    #[serde(default)]
    pub trademark_card_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub processor: String,
    #[serde(default)]
    pub toc_link: String,
    #[serde(default)]
    pub offer_link: String,
    #[serde(default)]
    pub agg_link: String,
    /// False when the disclosure table could not be segmented
    #[serde(default)]
    pub scraped_ok: bool,
    #[serde(flatten)]
    fields: BTreeMap<Attribute, Field>,
}

impl CardRecord {
    /// Create an empty record with every structured attribute present.
    /// Marker attributes are slicing aids and get no slot.
    pub fn new(full_card_name: &str) -> Self {
        let fields = Attribute::ALL
            .iter()
            .filter(|a| a.kind() != AttributeKind::Marker)
            .map(|a| (*a, Field::default()))
            .collect();
        Self {
            full_card_name: full_card_name.to_string(),
            scraped_ok: true,
            fields,
            ..Default::default()
        }
    }

    pub fn field(&self, attribute: Attribute) -> Option<&Field> {
        self.fields.get(&attribute)
    }

    /// Set the raw term for an attribute. Marker attributes are ignored.
    pub fn set_term(&mut self, attribute: Attribute, term: String) {
        if attribute.kind() == AttributeKind::Marker {
            return;
        }
        self.fields.entry(attribute).or_default().term = term;
    }

    /// Iterate attributes in catalogue order
    pub fn fields(&self) -> impl Iterator<Item = (Attribute, &Field)> {
        self.fields.iter().map(|(a, f)| (*a, f))
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = (Attribute, &mut Field)> {
        self.fields.iter_mut().map(|(a, f)| (*a, f))
    }

    /// Convenience accessor for the normalized value of an attribute
    pub fn value(&self, attribute: Attribute) -> &str {
        self.field(attribute).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Convenience accessor for the raw term of an attribute
    pub fn term(&self, attribute: Attribute) -> &str {
        self.field(attribute).map(|f| f.term.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_all_structured_attributes() {
        let record = CardRecord::new("Test Card");
        assert_eq!(record.fields().count(), 23); // 26 minus three markers
        assert!(record.field(Attribute::PurchaseApr).is_some());
        assert!(record.field(Attribute::Termination).is_none());
    }

    #[test]
    fn test_marker_terms_are_dropped() {
        let mut record = CardRecord::new("Test Card");
        record.set_term(Attribute::Termination, "daily balance method".into());
        assert!(record.field(Attribute::Termination).is_none());
    }

    #[test]
    fn test_serialization_uses_snake_case_attribute_keys() {
        let mut record = CardRecord::new("Test Card");
        record.set_term(Attribute::AnnualFee, "None".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["annual_fee"]["term"], "None");
        assert_eq!(json["full_card_name"], "Test Card");
        // numbers are omitted until the reduction pass sets them
        assert!(json["annual_fee"].get("number").is_none());
    }

    #[test]
    fn test_roundtrip() {
        let mut record = CardRecord::new("Test Card");
        record.set_term(Attribute::Pros, "No annual fee".into());
        let json = serde_json::to_string(&record).unwrap();
        let back: CardRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
