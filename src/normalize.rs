use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Result, SchumerError};
use crate::schema::{Attribute, AttributeKind};

/// Value written when a per-attribute extraction rule fails; the batch
/// continues and the field is surfaced for manual correction.
pub const ERROR_SENTINEL: &str = "------ERROR------";

// Pre-compiled patterns (compile once, use many times)
static DOT_CAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[A-Z]").expect("regex"));
static COMMA_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",[a-zA-Z]").expect("regex"));
static LOWER_UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][A-Z]").expect("regex"));
static LOWER_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][0-9]").expect("regex"));
static LOWER_DOLLAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]\$").expect("regex"));
static COLON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":[0-9A-Za-z_]").expect("regex"));
static DIGIT_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][a-zA-Z]").expect("regex"));
static PCT_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[a-zA-Z]").expect("regex"));
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("regex"));

static RANGE_TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+%) +to +([\d.]+%)").expect("regex"));
static RANGE_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+%) +- +([\d.]+%)").expect("regex"));
static TRIPLE_PCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+%), +([\d.]+%),* +or +([\d.]+%)").expect("regex"));
static DOUBLE_PCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+%) +or +([\d.]+%)").expect("regex"));
static SINGLE_PCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d.]+%").expect("regex"));

static MONTHS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+ months").expect("regex"));
static CYCLES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+ billing cycles").expect("regex"));
static MOS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+ mos").expect("regex"));

static MONEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$[\d.]+").expect("regex"));
static CENTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) cents").expect("regex"));
static DAYS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) days").expect("regex"));
static SIX_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{6}").expect("regex"));
static EXT_WARRANTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Extended Warranty Protection.*").expect("regex"));

/// Normalize one attribute's raw term into its canonical value.
///
/// Total: an internal extraction failure is logged and becomes the error
/// sentinel rather than propagating, so one bad cell never takes down a
/// batch.
pub fn normalize_value(attribute: Attribute, term: &str) -> String {
    match try_normalize(attribute, term) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("extraction failed for {}: {}", attribute.name(), e);
            ERROR_SENTINEL.to_string()
        }
    }
}

fn try_normalize(attribute: Attribute, term: &str) -> Result<String> {
    match attribute.kind() {
        AttributeKind::FreeText => Ok(term.to_string()),
        AttributeKind::CreditScore => Ok(credit_score_value(term)),
        AttributeKind::OfferDetails => Ok(offer_details_value(term)),
        AttributeKind::AggText => Ok(clean_text(term)),
        AttributeKind::Integer => Ok(grace_period_value(term)),
        AttributeKind::Money => money_value(attribute, term),
        AttributeKind::WeirdFee => Ok(weird_fee_value(attribute, &clean_text(term))),
        AttributeKind::Percent => {
            let cleaned = clean_text(term);
            let percent =
                percent_value(attribute, &cleaned).ok_or_else(|| SchumerError::Normalization {
                    attribute: attribute.name().to_string(),
                    reason: "multi-sentence term with no percentage".to_string(),
                })?;
            // the intro-then-ongoing framing applies to every percent
            // attribute, not only the purchase and transfer APRs
            Ok(combine_lead_sentence(&cleaned, &percent))
        }
        AttributeKind::Marker => Ok(String::new()),
    }
}

/// Shared text cleaner: undoes the concatenation and line-break artifacts
/// left behind when markup is stripped from a page.
///
/// Collapses newlines, re-inserts the spaces lost between a lowercase letter
/// and a following capital/digit/`$`, and after `.`/`,`/`:` glued to the
/// next word, drops one trailing `.` or `*`, collapses space runs, and
/// strips known boilerplate phrases. Leading/trailing single spaces are left
/// in place.
pub fn clean_text(term: &str) -> String {
    if term.is_empty() || term == " " {
        return String::new();
    }

    let mut answer = term.replace('\n', " ").replace("&nbsp;", "");

    for re in [
        &*DOT_CAP_RE,
        &*COMMA_LETTER_RE,
        &*LOWER_UPPER_RE,
        &*LOWER_DIGIT_RE,
        &*LOWER_DOLLAR_RE,
        &*COLON_WORD_RE,
        &*DIGIT_LETTER_RE,
        &*PCT_LETTER_RE,
    ] {
        answer = split_pair(re, &answer);
    }

    if answer.ends_with('.') || answer.ends_with('*') {
        answer.pop();
    }

    answer = MULTI_SPACE_RE.replace_all(&answer, " ").into_owned();
    answer = answer.replace("Terms Apply", "");
    answer = answer.replace(" introductory APR", "");

    if answer.trim().is_empty() {
        return String::new();
    }
    answer
}

// Insert a space between the two characters of each match
fn split_pair(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let pair = &caps[0];
        format!("{} {}", &pair[..1], &pair[1..])
    })
    .into_owned()
}

/// Dollar-amount extraction. The largest disclosed figure is the
/// representative one.
fn money_value(attribute: Attribute, term: &str) -> Result<String> {
    let term = term.replace("Frequently Asked Questions", "");
    let lower = term.to_lowercase();

    // The minimum interest charge is routinely quoted in cents
    if attribute == Attribute::MinimumInterestChargeApr {
        if lower.contains("none") {
            return Ok("$0".to_string());
        }
        if term.contains("cents") {
            let caps = CENTS_RE
                .captures(&term)
                .ok_or_else(|| normalization_error(attribute, "cents phrase without an amount"))?;
            let cents: f64 = caps[1]
                .parse()
                .map_err(|_| normalization_error(attribute, "unparseable cents amount"))?;
            return Ok(format!("${:.2}", cents / 100.0));
        }
    }

    if lower.contains("none") || lower.contains("not applicable") {
        return Ok("$0".to_string());
    }

    if !term.contains('$') {
        // fee is not shown in the terms at all
        return Ok(String::new());
    }

    let mut best: Option<(f64, &str)> = None;
    for m in MONEY_RE.find_iter(&term) {
        let token = m.as_str();
        let amount = token[1..]
            .trim_end_matches('.')
            .parse::<f64>()
            .unwrap_or(f64::NEG_INFINITY);
        if best.map_or(true, |(top, _)| amount > top) {
            best = Some((amount, token));
        }
    }
    let (_, token) =
        best.ok_or_else(|| normalization_error(attribute, "dollar sign without an amount"))?;

    // "$.5" -> "$0.5", "$34.3." -> "$34.3"
    let mut value = token.to_string();
    if value.starts_with("$.") {
        value = value.replacen("$.", "$0.", 1);
    }
    if value.ends_with('.') {
        value.pop();
    }
    Ok(value)
}

/// Percentage extraction over an already-cleaned term.
///
/// Returns `None` on the ambiguous path: no percentage anywhere but the
/// term spans multiple sentences, which the caller treats as a failed
/// extraction rather than a confident empty.
fn percent_value(attribute: Attribute, cleaned: &str) -> Option<String> {
    if cleaned.is_empty() {
        return Some(String::new());
    }

    let lower = cleaned.to_lowercase();
    let is_check = matches!(
        attribute,
        Attribute::IntroAprCheck | Attribute::VariableAprCheck
    );
    if is_check && (lower.contains("n/a") || lower.contains("none")) {
        return Some("None".to_string());
    }
    if lower.contains("none") || lower.contains("not applicable") || lower.contains("n/a") {
        // the intro check signals absence with an empty value instead of 0%
        return Some(if attribute == Attribute::IntroAprCheck {
            String::new()
        } else {
            "0%".to_string()
        });
    }

    // most specific shape first: range, then three-way, two-way, single
    if let Some(caps) = RANGE_TO_RE
        .captures(cleaned)
        .or_else(|| RANGE_DASH_RE.captures(cleaned))
    {
        return Some(format!("{} to {}", &caps[1], &caps[2]));
    }
    if let Some(caps) = TRIPLE_PCT_RE.captures(cleaned) {
        return Some(format!("{}, {}, or {}", &caps[1], &caps[2], &caps[3]));
    }
    if let Some(caps) = DOUBLE_PCT_RE.captures(cleaned) {
        return Some(format!("{} or {}", &caps[1], &caps[2]));
    }
    if let Some(m) = SINGLE_PCT_RE.find(cleaned) {
        let single = m.as_str();
        if attribute == Attribute::IntroAprCheck {
            if let Some(duration) = duration_phrase(cleaned) {
                return Some(format!("{} for {}", single, duration));
            }
        }
        return Some(single.to_string());
    }

    if cleaned.find(". ").map_or(false, |i| i > 0) {
        return None;
    }
    Some(String::new())
}

// "15 months", "12 billing cycles", or "15 mos" normalized to months
fn duration_phrase(cleaned: &str) -> Option<String> {
    if let Some(m) = MONTHS_RE.find(cleaned) {
        return Some(m.as_str().to_string());
    }
    if let Some(m) = CYCLES_RE.find(cleaned) {
        return Some(m.as_str().to_string());
    }
    MOS_RE.find(cleaned).map(|m| {
        let s = m.as_str();
        format!("{}months", &s[..s.len() - 3])
    })
}

/// Prepend the term's first sentence as the introductory-rate framing:
/// "<first sentence>. After that, <percent>".
fn combine_lead_sentence(cleaned: &str, percent: &str) -> String {
    match cleaned.find(". ") {
        Some(i) if i > 0 => format!("{}. After that, {}", &cleaned[..i], percent),
        _ => percent.to_string(),
    }
}

// Grace period, e.g. "25 days"
fn grace_period_value(term: &str) -> String {
    DAYS_RE
        .captures(term)
        .map(|caps| format!("{} days", &caps[1]))
        .unwrap_or_default()
}

/// The recommended score range appears as two concatenated three-digit
/// bounds, e.g. "690850".
fn credit_score_value(term: &str) -> String {
    SIX_DIGIT_RE
        .find(term)
        .map(|m| {
            let digits = m.as_str();
            format!("{} to {}", &digits[..3], &digits[3..])
        })
        .unwrap_or_default()
}

/// Fees phrased as a percentage, a flat dollar amount, or "whichever is
/// greater" of the two.
fn weird_fee_value(attribute: Attribute, cleaned: &str) -> String {
    if cleaned.is_empty() {
        return String::new();
    }
    let unit = match attribute {
        Attribute::BalanceTransferFee => "transfer",
        Attribute::CashAdvanceFee => "advance",
        _ => return String::new(),
    };

    let percent = SINGLE_PCT_RE.find(cleaned).map(|m| m.as_str());
    let dollars = MONEY_RE.find(cleaned).map(|m| m.as_str());

    match (percent, dollars) {
        (Some(p), Some(d)) => {
            format!("either {} of each {}  or {}, whichever is greater", p, unit, d)
        }
        (Some(p), None) => format!("{} of each {}", p, unit),
        (None, Some(d)) => d.to_string(),
        (None, None) => String::new(),
    }
}

/// Strip the known boilerplate that the review page appends to the card
/// details blurb, and repair line-wrapped tokens like "U.\nS.".
fn offer_details_value(term: &str) -> String {
    let mut answer = EXT_WARRANTY_RE.replace_all(term, "").into_owned();

    answer = answer.replace("U.\nS.", "U.S.");
    answer = answer.replace(".\ncom", ".com");
    for noise in [
        "Learn More.",
        "Terms Apply.\n",
        "Terms Apply.",
        "View Rates and Fees_APRPurchase: N/A\n",
        "View Rates and Fees_APRPurchase: N/A",
        "View Rates and Fees\n",
        "View Rates and Fees",
        "Terms & Limitations Apply\n",
        "Terms and limitations apply\n",
    ] {
        answer = answer.replace(noise, "");
    }
    answer
}

fn normalization_error(attribute: Attribute, reason: &str) -> SchumerError {
    SchumerError::Normalization {
        attribute: attribute.name().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_undoes_concatenation() {
        assert_eq!(
            clean_text("0% intro\nAPR.Then 14.99%applies"),
            "0% intro APR. Then 14.99% applies"
        );
        assert_eq!(clean_text("fee:none"), "fee: none");
        assert_eq!(clean_text("pay$5now"), "pay $5 now");
    }

    #[test]
    fn test_clean_text_strips_trailing_period_and_boilerplate() {
        assert_eq!(clean_text("2x points Terms Apply."), "2 x points ");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_money_none_is_zero() {
        let v = normalize_value(Attribute::AnnualFee, "None of this fee applies");
        assert_eq!(v, "$0");
        let v = normalize_value(Attribute::LatePaymentFee, "Not Applicable");
        assert_eq!(v, "$0");
    }

    #[test]
    fn test_money_picks_largest_amount() {
        let v = normalize_value(Attribute::LatePaymentFee, "$5, $12.50, or $3");
        assert_eq!(v, "$12.50");
    }

    #[test]
    fn test_money_fixes_bare_decimal_and_trailing_period() {
        assert_eq!(normalize_value(Attribute::OverLimitFee, "$.75 due."), "$0.75");
        assert_eq!(normalize_value(Attribute::OverLimitFee, "Up to $40."), "$40");
    }

    #[test]
    fn test_money_missing_fee_is_empty() {
        assert_eq!(normalize_value(Attribute::ReturnedCheckFee, ""), "");
        assert_eq!(
            normalize_value(Attribute::ReturnedCheckFee, "See cardmember agreement"),
            ""
        );
    }

    #[test]
    fn test_minimum_interest_charge_cents() {
        let v = normalize_value(
            Attribute::MinimumInterestChargeApr,
            "will be no less than 50 cents",
        );
        assert_eq!(v, "$0.50");
        let v = normalize_value(Attribute::MinimumInterestChargeApr, "35 cents");
        assert_eq!(v, "$0.35");
        let v = normalize_value(Attribute::MinimumInterestChargeApr, "None");
        assert_eq!(v, "$0");
    }

    #[test]
    fn test_percent_range() {
        let v = normalize_value(Attribute::PenaltyApr, "15% to 22%");
        assert_eq!(v, "15% to 22%");
        let v = normalize_value(Attribute::PenaltyApr, "15.24% - 22.24%");
        assert_eq!(v, "15.24% to 22.24%");
    }

    #[test]
    fn test_percent_lists() {
        let v = normalize_value(Attribute::CashAdvanceApr, "13.99%, 18.99%, or 23.99%");
        assert_eq!(v, "13.99%, 18.99%, or 23.99%");
        let v = normalize_value(Attribute::CashAdvanceApr, "18.99% or 23.99%");
        assert_eq!(v, "18.99% or 23.99%");
    }

    #[test]
    fn test_percent_none_is_zero() {
        assert_eq!(normalize_value(Attribute::PenaltyApr, "None"), "0%");
    }

    #[test]
    fn test_intro_check_conventions() {
        // n/a and none collapse to the literal "None" for the checks
        assert_eq!(normalize_value(Attribute::IntroAprCheck, "N/A"), "None");
        assert_eq!(normalize_value(Attribute::VariableAprCheck, "none"), "None");
        // "not applicable" falls through to the general branch instead
        assert_eq!(
            normalize_value(Attribute::IntroAprCheck, "Not applicable for this card"),
            ""
        );
        assert_eq!(
            normalize_value(Attribute::VariableAprCheck, "Not applicable for this card"),
            "0%"
        );
    }

    #[test]
    fn test_intro_check_duration() {
        let v = normalize_value(Attribute::IntroAprCheck, "0% for 15 months, then 19.99%");
        assert_eq!(v, "0% for 15 months");
        let v = normalize_value(Attribute::IntroAprCheck, "0% for 15 mos");
        assert_eq!(v, "0% for 15 months");
        let v = normalize_value(Attribute::IntroAprCheck, "0% for 12 billing cycles");
        assert_eq!(v, "0% for 12 billing cycles");
    }

    #[test]
    fn test_lead_sentence_framing() {
        let v = normalize_value(
            Attribute::PurchaseApr,
            "0% intro APR for 15 months. After that, 15.24% to 22.24%, based on your creditworthiness",
        );
        assert_eq!(
            v,
            "0% intro APR for 15 months. After that, 15.24% to 22.24%"
        );
    }

    #[test]
    fn test_percent_multi_sentence_without_percentage_errors() {
        let v = normalize_value(Attribute::PurchaseApr, "Special rate applies. See terms.");
        assert_eq!(v, ERROR_SENTINEL);
    }

    #[test]
    fn test_grace_period() {
        let v = normalize_value(
            Attribute::PayingInterest,
            "at least 25 days after the close of each billing cycle",
        );
        assert_eq!(v, "25 days");
        assert_eq!(normalize_value(Attribute::PayingInterest, "no grace period"), "");
    }

    #[test]
    fn test_credit_score_pair() {
        assert_eq!(normalize_value(Attribute::CreditScore, "\n670700\n"), "670 to 700");
        assert_eq!(normalize_value(Attribute::CreditScore, "excellent"), "");
    }

    #[test]
    fn test_weird_fee_both_values() {
        let v = normalize_value(Attribute::CashAdvanceFee, "Either $10 or 3% of each advance");
        assert_eq!(v, "either 3% of each advance  or $10, whichever is greater");
        let v = normalize_value(
            Attribute::BalanceTransferFee,
            "Either $5 or 3% of the amount of each transfer",
        );
        assert_eq!(v, "either 3% of each transfer  or $5, whichever is greater");
    }

    #[test]
    fn test_weird_fee_single_values() {
        assert_eq!(
            normalize_value(Attribute::CashAdvanceFee, "3% of the advance"),
            "3% of each advance"
        );
        assert_eq!(normalize_value(Attribute::BalanceTransferFee, "flat $5"), "$5");
        assert_eq!(normalize_value(Attribute::BalanceTransferFee, ""), "");
    }

    #[test]
    fn test_offer_details_cleanup() {
        let term = "Earn 2x points in the U.\nS. supermarkets.\nTerms Apply.\nLearn More.";
        let v = normalize_value(Attribute::OfferDetails, term);
        assert_eq!(v, "Earn 2x points in the U.S. supermarkets.\n");
    }

    #[test]
    fn test_pros_and_cons_pass_through() {
        let term = "\nNo annual fee\nGenerous rewards\n";
        assert_eq!(normalize_value(Attribute::Pros, term), term);
        assert_eq!(normalize_value(Attribute::Cons, term), term);
    }

    #[test]
    fn test_agg_text_only_cleaned() {
        let v = normalize_value(Attribute::RewardsRate, "\n1% to 4% cash back\n");
        assert_eq!(v, " 1% to 4% cash back ");
    }
}
