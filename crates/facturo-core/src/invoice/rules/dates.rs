//! Issue date extraction.

use super::normalize::normalize_date;
use super::patterns::INVOICE_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Labeled issue date extractor ("Fecha de factura: 01/02/2024").
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_DATE
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let date = normalize_date(&caps[1]);
                if date.is_empty() {
                    return None;
                }
                Some(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Issue date as printed, or an empty string.
pub fn extract_invoice_date(text: &str) -> String {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_variants() {
        assert_eq!(extract_invoice_date("Fecha de factura: 01/02/2024"), "01/02/2024");
        assert_eq!(extract_invoice_date("Fecha de facturación 15.01.2024"), "15.01.2024");
        assert_eq!(extract_invoice_date("Fecha de emisión:\n2024-01-15"), "2024-01-15");
        assert_eq!(extract_invoice_date("Fecha d factura - 1/2/2024"), "1/2/2024");
    }

    #[test]
    fn test_unlabeled_date_ignored() {
        assert_eq!(extract_invoice_date("Madrid, 01/02/2024"), "");
        assert_eq!(extract_invoice_date("Fecha de vencimiento: 01/03/2024"), "");
    }

    #[test]
    fn test_short_value_rejected() {
        assert_eq!(extract_invoice_date("Fecha de factura: 1/2/24"), "");
    }

    #[test]
    fn test_first_labeled_date_wins() {
        let text = "Fecha de emisión: 01/02/2024\nFecha de factura: 05/02/2024";
        let dates = DateExtractor::new().extract_all(text);
        assert_eq!(dates.len(), 2);
        assert_eq!(extract_invoice_date(text), "01/02/2024");
    }
}
