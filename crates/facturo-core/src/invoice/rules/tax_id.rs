//! Supplier tax identifier (CIF/NIF) extraction.

use super::patterns::SUPPLIER_TAX_ID;
use super::{ExtractionMatch, FieldExtractor};

const MAX_SUPPLIER_ID_LEN: usize = 50;

/// CIF/NIF extractor.
pub struct TaxIdExtractor;

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        SUPPLIER_TAX_ID
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let id: String = caps[1].chars().take(MAX_SUPPLIER_ID_LEN).collect();
                Some(
                    ExtractionMatch::new(id, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// First labeled tax identifier in the document, or an empty string.
///
/// The first one is assumed to belong to the issuer, since invoices print the
/// supplier block above the customer block.
pub fn extract_supplier_id(text: &str) -> String {
    TaxIdExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}
