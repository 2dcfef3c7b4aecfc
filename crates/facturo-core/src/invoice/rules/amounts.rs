//! Summary amount extraction: total, taxable base and IVA.
//!
//! Only the tail of the document is searched, since summary blocks sit at the
//! end and line items above them carry amounts of their own. Labeled patterns
//! are tried in a fixed priority order and the first usable match per field
//! wins. When a total is known but no base label matched, the base is taken
//! from the first bare amount that is a plausible share of the total.

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use super::normalize::normalize_amount;
use super::patterns::{
    BASE_LABELED, BASE_PARENTHESIZED, CANDIDATE_AMOUNT, TAX_DOTTED, TAX_LABELED,
    TAX_RATE_QUALIFIED, TOTAL_LABELED, TOTAL_UPPER,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// A bare numeric token found while scanning the summary window.
pub type AmountCandidate = ExtractionMatch<Decimal>;

/// Summary field a labeled pattern resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Total,
    Base,
    Tax,
}

/// Labeled patterns in priority order.
fn amount_rules() -> [(&'static Regex, AmountField); 7] {
    [
        (&*TOTAL_LABELED, AmountField::Total),
        (&*TOTAL_UPPER, AmountField::Total),
        (&*BASE_LABELED, AmountField::Base),
        (&*BASE_PARENTHESIZED, AmountField::Base),
        (&*TAX_LABELED, AmountField::Tax),
        (&*TAX_RATE_QUALIFIED, AmountField::Tax),
        (&*TAX_DOTTED, AmountField::Tax),
    ]
}

/// Amounts found in an invoice summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceAmounts {
    /// Invoice total.
    pub total: Option<Decimal>,
    /// Taxable base.
    pub base_amount: Option<Decimal>,
    /// IVA amount.
    pub tax_amount: Option<Decimal>,
    /// The base came from the ratio fallback rather than a label.
    #[serde(skip)]
    pub base_inferred: bool,
}

impl InvoiceAmounts {
    pub fn get(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::Total => self.total,
            AmountField::Base => self.base_amount,
            AmountField::Tax => self.tax_amount,
        }
    }

    fn slot_mut(&mut self, field: AmountField) -> &mut Option<Decimal> {
        match field {
            AmountField::Total => &mut self.total,
            AmountField::Base => &mut self.base_amount,
            AmountField::Tax => &mut self.tax_amount,
        }
    }
}

/// Amount field extractor.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    window_chars: usize,
    base_ratio_min: Decimal,
    base_ratio_max: Decimal,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            window_chars: config.summary_window_chars,
            base_ratio_min: config.base_ratio_min,
            base_ratio_max: config.base_ratio_max,
        }
    }

    /// Set the number of trailing characters searched.
    pub fn with_window(mut self, chars: usize) -> Self {
        self.window_chars = chars;
        self
    }

    /// Set the base/total ratio band used by the fallback.
    pub fn with_base_ratio_band(mut self, min: Decimal, max: Decimal) -> Self {
        self.base_ratio_min = min;
        self.base_ratio_max = max;
        self
    }

    /// Extract total, base and IVA from the document's summary window.
    pub fn extract_amounts(&self, text: &str) -> InvoiceAmounts {
        let window = trailing_window(text, self.window_chars);
        let candidates = self.extract_all(window);
        let mut amounts = InvoiceAmounts::default();

        for (index, (pattern, field)) in amount_rules().into_iter().enumerate() {
            let slot = amounts.slot_mut(field);
            if slot.is_some() {
                continue;
            }
            let Some(caps) = pattern.captures(window) else {
                continue;
            };
            if let Some(value) = normalize_amount(&caps[1]) {
                debug!("Rule {} resolved {:?} = {} from {:?}", index, field, value, &caps[0]);
                *slot = Some(value);
            } else {
                trace!("Rule {} matched {:?} without a usable amount", index, &caps[0]);
            }
        }

        if let (Some(total), None) = (amounts.total, amounts.base_amount) {
            if let Some(base) = self.infer_base(total, &candidates) {
                debug!("Inferred base {} from total {}", base, total);
                amounts.base_amount = Some(base);
                amounts.base_inferred = true;
            }
        }

        amounts
    }

    /// First candidate, in document order, inside the ratio band of `total`.
    fn infer_base(&self, total: Decimal, candidates: &[AmountCandidate]) -> Option<Decimal> {
        if total <= Decimal::ZERO {
            return None;
        }
        let low = total.checked_mul(self.base_ratio_min)?;
        let high = total.checked_mul(self.base_ratio_max)?;

        candidates
            .iter()
            .map(|c| c.value)
            .find(|v| low <= *v && *v <= high)
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = AmountCandidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CANDIDATE_AMOUNT
            .find_iter(text)
            .filter_map(|m| {
                normalize_amount(m.as_str())
                    .map(|value| ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// The last `max_chars` characters of `text`, or all of it when shorter.
pub fn trailing_window(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match text.char_indices().rev().nth(max_chars - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}
