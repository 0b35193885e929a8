//! Attribute catalogue and alias configuration
//!
//! Everything the pipeline needs to know about a disclosure page is data:
//! which attributes exist, which extraction rule applies to each, which
//! phrasings mark an attribute's section header, and which literals divide
//! the page into sections. All of it lives here as immutable configuration
//! with production defaults, passed into the pipeline at construction time.

use serde::{Deserialize, Serialize};

/// Which value-extraction rule applies to an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Percentage or percentage range (APRs, foreign transaction fee)
    Percent,
    /// Flat dollar amount; the largest disclosed figure wins
    Money,
    /// Grace period in days
    Integer,
    /// Two concatenated three-digit bounds ("690850")
    CreditScore,
    /// "Either X% or $Y, whichever is greater" fees
    WeirdFee,
    /// Passed through untouched (pros, cons)
    FreeText,
    /// Offer details with boilerplate stripped
    OfferDetails,
    /// Review-page free text run through the shared cleaner only
    AggText,
    /// Slicing aid only, never stored in a record
    Marker,
}

/// What the numeric reduction pass produces for an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShape {
    /// Not reduced
    None,
    /// One comparable float
    Single,
    /// Low/high credit score pair
    ScorePair,
}

/// The fixed, ordered catalogue of structured attributes.
///
/// Variant order is the canonical column order; `CardRecord` keeps its
/// fields in a `BTreeMap` keyed by this enum, so serialization order is
/// stable without any extra bookkeeping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Pros,
    Cons,
    CreditScore,
    OfferDetails,
    BonusOffer,
    RewardsRate,
    IntroAprCheck,
    VariableAprCheck,
    BalanceTransferApr,
    CashAdvanceApr,
    PenaltyApr,
    PurchaseApr,
    PayingInterest,
    TipsApr,
    Termination,
    PlanFee,
    MinimumInterestChargeApr,
    AnnualFee,
    AnnualFeeCheck,
    BalanceTransferFee,
    CashAdvanceFee,
    ForeignTransactionFee,
    LatePaymentFee,
    ReturnedPaymentFee,
    ReturnedCheckFee,
    OverLimitFee,
}

impl Attribute {
    /// Every attribute, in catalogue order
    pub const ALL: [Attribute; 26] = [
        Attribute::Pros,
        Attribute::Cons,
        Attribute::CreditScore,
        Attribute::OfferDetails,
        Attribute::BonusOffer,
        Attribute::RewardsRate,
        Attribute::IntroAprCheck,
        Attribute::VariableAprCheck,
        Attribute::BalanceTransferApr,
        Attribute::CashAdvanceApr,
        Attribute::PenaltyApr,
        Attribute::PurchaseApr,
        Attribute::PayingInterest,
        Attribute::TipsApr,
        Attribute::Termination,
        Attribute::PlanFee,
        Attribute::MinimumInterestChargeApr,
        Attribute::AnnualFee,
        Attribute::AnnualFeeCheck,
        Attribute::BalanceTransferFee,
        Attribute::CashAdvanceFee,
        Attribute::ForeignTransactionFee,
        Attribute::LatePaymentFee,
        Attribute::ReturnedPaymentFee,
        Attribute::ReturnedCheckFee,
        Attribute::OverLimitFee,
    ];

    /// Snake_case name as it appears in serialized output
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Pros => "pros",
            Attribute::Cons => "cons",
            Attribute::CreditScore => "credit_score",
            Attribute::OfferDetails => "offer_details",
            Attribute::BonusOffer => "bonus_offer",
            Attribute::RewardsRate => "rewards_rate",
            Attribute::IntroAprCheck => "intro_apr_check",
            Attribute::VariableAprCheck => "variable_apr_check",
            Attribute::BalanceTransferApr => "balance_transfer_apr",
            Attribute::CashAdvanceApr => "cash_advance_apr",
            Attribute::PenaltyApr => "penalty_apr",
            Attribute::PurchaseApr => "purchase_apr",
            Attribute::PayingInterest => "paying_interest",
            Attribute::TipsApr => "tips_apr",
            Attribute::Termination => "termination",
            Attribute::PlanFee => "plan_fee",
            Attribute::MinimumInterestChargeApr => "minimum_interest_charge_apr",
            Attribute::AnnualFee => "annual_fee",
            Attribute::AnnualFeeCheck => "annual_fee_check",
            Attribute::BalanceTransferFee => "balance_transfer_fee",
            Attribute::CashAdvanceFee => "cash_advance_fee",
            Attribute::ForeignTransactionFee => "foreign_transaction_fee",
            Attribute::LatePaymentFee => "late_payment_fee",
            Attribute::ReturnedPaymentFee => "returned_payment_fee",
            Attribute::ReturnedCheckFee => "returned_check_fee",
            Attribute::OverLimitFee => "over_limit_fee",
        }
    }

    /// Which extraction rule applies; static, never inferred at runtime
    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Pros | Attribute::Cons => AttributeKind::FreeText,
            Attribute::CreditScore => AttributeKind::CreditScore,
            Attribute::OfferDetails => AttributeKind::OfferDetails,
            Attribute::BonusOffer | Attribute::RewardsRate => AttributeKind::AggText,
            Attribute::IntroAprCheck
            | Attribute::VariableAprCheck
            | Attribute::BalanceTransferApr
            | Attribute::CashAdvanceApr
            | Attribute::PenaltyApr
            | Attribute::PurchaseApr
            | Attribute::ForeignTransactionFee => AttributeKind::Percent,
            Attribute::PayingInterest => AttributeKind::Integer,
            Attribute::TipsApr | Attribute::Termination | Attribute::PlanFee => {
                AttributeKind::Marker
            }
            Attribute::MinimumInterestChargeApr
            | Attribute::AnnualFee
            | Attribute::AnnualFeeCheck
            | Attribute::LatePaymentFee
            | Attribute::ReturnedPaymentFee
            | Attribute::ReturnedCheckFee
            | Attribute::OverLimitFee => AttributeKind::Money,
            Attribute::BalanceTransferFee | Attribute::CashAdvanceFee => AttributeKind::WeirdFee,
        }
    }

    /// Whether the comparison pass produces a number for this attribute.
    /// The check attributes and the grace period keep value-only form.
    pub fn number_shape(self) -> NumberShape {
        match self {
            Attribute::BalanceTransferApr
            | Attribute::CashAdvanceApr
            | Attribute::PenaltyApr
            | Attribute::PurchaseApr
            | Attribute::ForeignTransactionFee
            | Attribute::BalanceTransferFee
            | Attribute::CashAdvanceFee
            | Attribute::MinimumInterestChargeApr
            | Attribute::AnnualFee
            | Attribute::LatePaymentFee
            | Attribute::ReturnedPaymentFee
            | Attribute::ReturnedCheckFee
            | Attribute::OverLimitFee => NumberShape::Single,
            Attribute::CreditScore => NumberShape::ScorePair,
            _ => NumberShape::None,
        }
    }
}

/// One section's worth of alias entries: attribute -> ordered phrasings.
///
/// List order is precedence. The first alias found anywhere in the section
/// wins for that attribute, even if a later alias occurs earlier in the
/// text; more specific phrasings go first.
pub type AliasEntries = Vec<(Attribute, Vec<String>)>;

/// Alias catalogue for every section of the two supported page kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasTable {
    /// Interest rates and interest charges (upper table)
    pub upper_table: AliasEntries,
    /// First fees section
    pub annual_fees: AliasEntries,
    /// Second fees section
    pub transaction_fees: AliasEntries,
    /// Third fees section, plus the termination markers that end the table
    pub penalty_fees: AliasEntries,
    /// Review aggregator page headers
    pub aggregator: AliasEntries,
}

fn entries(table: &[(Attribute, &[&str])]) -> AliasEntries {
    table
        .iter()
        .map(|(attr, aliases)| {
            (*attr, aliases.iter().map(|a| a.to_string()).collect())
        })
        .collect()
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            upper_table: entries(&[
                (
                    Attribute::PurchaseApr,
                    &[
                        "Annual Percentage Rate (APR) for Purchases",
                        "Annual percentage rates (APR) for purchases",
                        "Purchase Annual Percentage Rate (APR)",
                        "Annual Percentage Rate  (APR) for Purchases",
                        "Annual Percentage Rate (APR) for Purchases and Transfers",
                        "Variable Annual Percentage Rate (APR)",
                    ],
                ),
                (
                    Attribute::BalanceTransferApr,
                    &[
                        "Annual Percentage Rate (APR) for Balance Transfers",
                        "APR for Balance Transfers",
                        "Balance Transfer APR",
                        "APR for Transfers",
                    ],
                ),
                (
                    Attribute::CashAdvanceApr,
                    &["APR for Cash Advances", "Cash Advance APR"],
                ),
                (
                    Attribute::PenaltyApr,
                    &[
                        "Penalty APR and When it Applies",
                        "Penalty APRand When it Applies",
                        "Penalty APR and When  It Applies",
                    ],
                ),
                (
                    Attribute::PayingInterest,
                    &[
                        "How to Avoid Paying Finance Charges on Purchases",
                        "How to Avoid Paying Interest on Purchases",
                        "Paying Interest",
                        "Grace Period",
                    ],
                ),
                (
                    Attribute::PlanFee,
                    &["Plan Fee (Fixed Finance Charge)", "Plan Fee"],
                ),
                (
                    Attribute::MinimumInterestChargeApr,
                    &["Minimum Interest Charge"],
                ),
                (
                    Attribute::TipsApr,
                    &[
                        "For Credit Card Tips from the Consumer Financial Protection Bureau",
                        "Credit Card Tips from the Consumer Financial Protection Bureau",
                    ],
                ),
            ]),
            annual_fees: entries(&[(
                Attribute::AnnualFee,
                &["Annual Fee", "Annual Membership Fee"],
            )]),
            transaction_fees: entries(&[
                (
                    Attribute::BalanceTransferFee,
                    &["Balance Transfers", "Balance Transfer", "Transfer"],
                ),
                (
                    Attribute::CashAdvanceFee,
                    &[
                        "Cash Advances and Convenience Checks",
                        "Cash Advances",
                        "Cash Advance",
                        "ATM Cash Advance",
                    ],
                ),
                (
                    Attribute::ForeignTransactionFee,
                    &[
                        "Foreign Transactions",
                        "Foreign Currency Conversion Fee",
                        "Foreign Transaction",
                        "Foreign Purchase Transaction",
                    ],
                ),
            ]),
            penalty_fees: entries(&[
                (Attribute::LatePaymentFee, &["Late Payment"]),
                (
                    Attribute::ReturnedPaymentFee,
                    &["Returned Payment", "Return Payment"],
                ),
                (
                    Attribute::ReturnedCheckFee,
                    &["Returned Check", "Return Check"],
                ),
                (
                    Attribute::OverLimitFee,
                    &["Overlimit", "Over-the-Credit-Limit", "Over the limit fee"],
                ),
                (
                    Attribute::Termination,
                    &[
                        "How We Will Calculate",
                        "How we calculate interest",
                        "Note: This account may not be eligible",
                        "TERMS AND CONDITIONS",
                        "How Do You Calculate My Balance?",
                        "For more information or any questions",
                        "Details about your interest rates",
                        "When applicable",
                        "Information Regarding the Pay Over Time Feature",
                        "Details About Your Interest",
                    ],
                ),
            ]),
            aggregator: entries(&[
                (Attribute::Pros, &["_Pros", "_ Pros"]),
                (Attribute::Cons, &["_Cons", "_ Cons"]),
                (Attribute::CreditScore, &["_Recommended credit score"]),
                (Attribute::OfferDetails, &["_Card details"]),
                (Attribute::BonusOffer, &["_Bonus offer"]),
                (Attribute::RewardsRate, &["_Rewards rate"]),
                (Attribute::IntroAprCheck, &["_Intro APR"]),
                (Attribute::VariableAprCheck, &["_APR, Variable"]),
                (Attribute::AnnualFeeCheck, &["_Annual fee"]),
            ]),
        }
    }
}

/// Divider literals that split a disclosure page into its sections.
///
/// Each group is an ordered list of alternative spellings; within a group
/// the first spelling found wins. Issuers typeset the fee headings in wildly
/// inconsistent ways, hence the long first group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividerSet {
    /// Boundary between the APR table and the fees table
    pub fees: Vec<String>,
    /// Boundary between annual fees and transaction fees
    pub transaction: Vec<String>,
    /// Boundary between transaction fees and penalty fees
    pub penalty: Vec<String>,
}

fn spellings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for DividerSet {
    fn default() -> Self {
        Self {
            fees: spellings(&[
                "Fee Summary",
                "fees annual",
                "feesannual",
                "fees\nannual",
                "fees \nannual",
                "fees\nFlexPerks",
                "fees  transaction",
                "FeesSKYPASS",
                "FeesVisa",
                "FeesU.S. Bank",
                "Fees Transaction",
                "FeesFlexPerks",
                "Fees       Annual",
                "Fees     Annual",
                "Fees",
                "Fee",
            ]),
            transaction: spellings(&["transaction fees", "transactionfees", "transaction\nfees"]),
            penalty: spellings(&["penalty fees", "penaltyfees", "penalty\nfees"]),
        }
    }
}

/// Literal markers used to recognize and condense the review aggregator page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggMarkers {
    /// Header present on both layouts; its position relative to
    /// `score_header` distinguishes them
    pub details_header: String,
    /// Start marker for the score-on-top layout
    pub score_header: String,
    /// End marker for the score-on-top layout
    pub score_layout_end: String,
    /// End marker for the details-first layout
    pub details_layout_end: String,
    /// The trademark card name sits between these two
    pub trademark_start: String,
    pub trademark_end: String,
}

impl Default for AggMarkers {
    fn default() -> Self {
        Self {
            details_header: "_Card details".to_string(),
            score_header: "Recommended credit score".to_string(),
            score_layout_end: "NerdWallet reviews are the result of independent research"
                .to_string(),
            details_layout_end: "See if you may qualify".to_string(),
            trademark_start: "Advertiser Disclosure".to_string(),
            trademark_end: "Apply Now".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_complete_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for attr in Attribute::ALL {
            assert!(seen.insert(attr.name()), "duplicate name {}", attr.name());
        }
        assert_eq!(seen.len(), Attribute::ALL.len());
    }

    #[test]
    fn test_every_aliased_attribute_is_in_catalogue() {
        let table = AliasTable::default();
        for section in [
            &table.upper_table,
            &table.annual_fees,
            &table.transaction_fees,
            &table.penalty_fees,
            &table.aggregator,
        ] {
            for (attr, aliases) in section {
                assert!(Attribute::ALL.contains(attr));
                assert!(!aliases.is_empty());
            }
        }
    }

    #[test]
    fn test_markers_carry_no_number() {
        for attr in [Attribute::TipsApr, Attribute::Termination, Attribute::PlanFee] {
            assert_eq!(attr.kind(), AttributeKind::Marker);
            assert_eq!(attr.number_shape(), NumberShape::None);
        }
    }

    #[test]
    fn test_credit_score_shape() {
        assert_eq!(Attribute::CreditScore.number_shape(), NumberShape::ScorePair);
        assert_eq!(Attribute::AnnualFee.number_shape(), NumberShape::Single);
        assert_eq!(Attribute::IntroAprCheck.number_shape(), NumberShape::None);
    }
}
