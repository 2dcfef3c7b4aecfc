//! Rule-based invoice parser assembling one record per document.

use std::path::Path;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::InvoiceRecord;

use super::rules::{
    amounts::AmountExtractor, dates::extract_invoice_date, normalize::normalize_identifier,
    patterns::*, tax_id::extract_supplier_id,
};
use super::Result;
use crate::error::ExtractionError;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: InvoiceRecord,
    /// Fields that were left empty or filled by a fallback.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse one document's text. `source_name` is the document's file name.
    fn parse(&self, text: &str, source_name: &str) -> Result<ExtractionResult>;
}

/// Parser applying the fixed pattern rules.
#[derive(Debug, Clone, Default)]
pub struct RuleInvoiceParser {
    amounts: AmountExtractor,
}

impl RuleInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            amounts: AmountExtractor::new(),
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            amounts: AmountExtractor::from_config(config),
        }
    }

    /// Set the size of the trailing window searched for amounts.
    pub fn with_summary_window(mut self, chars: usize) -> Self {
        self.amounts = self.amounts.with_window(chars);
        self
    }

    /// Set the base/total ratio band used when no base label matches.
    pub fn with_base_ratio_band(mut self, min: Decimal, max: Decimal) -> Self {
        self.amounts = self.amounts.with_base_ratio_band(min, max);
        self
    }

    /// Build the record for one document. Never fails: whatever is not found
    /// is left empty.
    pub fn extract_record(&self, text: &str, source_name: &str) -> InvoiceRecord {
        self.assemble(text, source_name).0
    }

    fn assemble(&self, text: &str, source_name: &str) -> (InvoiceRecord, Vec<String>) {
        let mut warnings = Vec::new();

        let invoice_number = match self.extract_invoice_number(text) {
            Some(number) => number,
            None => {
                warnings.push("Invoice number taken from file name".to_string());
                invoice_number_from_file_name(source_name)
            }
        };

        let invoice_date = extract_invoice_date(text);
        if invoice_date.is_empty() {
            warnings.push("Could not extract invoice date".to_string());
        }

        let supplier_id = extract_supplier_id(text);
        if supplier_id.is_empty() {
            warnings.push("Could not extract supplier tax ID".to_string());
        }

        let amounts = self.amounts.extract_amounts(text);
        if amounts.total.is_none() {
            warnings.push("Could not extract total amount".to_string());
        }
        if amounts.base_inferred {
            warnings.push("Base amount inferred from total".to_string());
        } else if amounts.base_amount.is_none() {
            warnings.push("Could not extract base amount".to_string());
        }
        if amounts.tax_amount.is_none() {
            warnings.push("Could not extract IVA amount".to_string());
        }

        let record = InvoiceRecord {
            invoice_number,
            invoice_date,
            supplier_id,
            customer: String::new(),
            base_amount: amounts.base_amount,
            tax_amount: amounts.tax_amount,
            total_amount: amounts.total,
            source_name: source_name.to_string(),
        };

        (record, warnings)
    }

    fn extract_invoice_number(&self, text: &str) -> Option<String> {
        [&*INVOICE_NUMBER_LABELED, &*INVOICE_NUMBER_NUMERO, &*INVOICE_NUMBER_FACTURA]
            .into_iter()
            .find_map(|pattern| pattern.captures(text))
            .map(|caps| normalize_identifier(&caps[1]))
            .filter(|number| !number.is_empty())
    }
}

impl InvoiceParser for RuleInvoiceParser {
    fn parse(&self, text: &str, source_name: &str) -> Result<ExtractionResult> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText);
        }

        let start = Instant::now();
        info!("Parsing {} from {} characters of text", source_name, text.len());

        let (record, warnings) = self.assemble(text, source_name);
        for warning in &warnings {
            debug!("{}: {}", source_name, warning);
        }

        Ok(ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// File name without its extension ("INV-2024-07.pdf" -> "INV-2024-07").
fn invoice_number_from_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());

    match stem {
        Some(stem) => stem.to_string(),
        None if !source_name.is_empty() => source_name.to_string(),
        None => "UNKNOWN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_basic_invoice() {
        let text = "Factura: A123\nFecha de factura: 01/02/2024\nBase imponible: 80,00\nIVA: 16,80\nTotal: 96,80\nCIF: B12345678";

        let parser = RuleInvoiceParser::new();
        let result = parser.parse(text, "a123.pdf").unwrap();

        assert_eq!(
            result.record,
            InvoiceRecord {
                invoice_number: "A123".to_string(),
                invoice_date: "01/02/2024".to_string(),
                supplier_id: "B12345678".to_string(),
                customer: String::new(),
                base_amount: Some(dec("80.00")),
                tax_amount: Some(dec("16.80")),
                total_amount: Some(dec("96.80")),
                source_name: "a123.pdf".to_string(),
            }
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_extract_invoice_number() {
        let parser = RuleInvoiceParser::new();

        assert_eq!(
            parser.extract_invoice_number("Nº de factura: FV2024_001"),
            Some("FV2024_001".to_string())
        );
        assert_eq!(
            parser.extract_invoice_number("N.° de factura 77"),
            Some("77".to_string())
        );
        assert_eq!(
            parser.extract_invoice_number("Número: 2024-0042"),
            Some("2024".to_string())
        );
        assert_eq!(
            parser.extract_invoice_number("Factura-X99 emitida"),
            Some("X99".to_string())
        );
        assert_eq!(parser.extract_invoice_number("sin referencia"), None);
    }

    #[test]
    fn test_invoice_number_priority() {
        let parser = RuleInvoiceParser::new();
        let text = "Factura: F1\nNúmero: N2\nNº de factura: L3";
        assert_eq!(parser.extract_invoice_number(text), Some("L3".to_string()));
    }

    #[test]
    fn test_invoice_number_falls_back_to_file_name() {
        let parser = RuleInvoiceParser::new();
        let result = parser.parse("Total: 12,00", "INV-2024-07.pdf").unwrap();

        assert_eq!(result.record.invoice_number, "INV-2024-07");
        assert_eq!(result.record.source_name, "INV-2024-07.pdf");
        assert!(result
            .warnings
            .contains(&"Invoice number taken from file name".to_string()));
    }

    #[test]
    fn test_file_name_without_stem() {
        assert_eq!(invoice_number_from_file_name("scan"), "scan");
        assert_eq!(invoice_number_from_file_name("dir/inv.final.pdf"), "inv.final");
        assert_eq!(invoice_number_from_file_name(""), "UNKNOWN");
    }

    #[test]
    fn test_customer_always_empty() {
        let parser = RuleInvoiceParser::new();
        let record = parser.extract_record("Cliente: ACME S.L.\nTotal: 10,00", "x.pdf");
        assert_eq!(record.customer, "");
    }

    #[test]
    fn test_inferred_base_warning() {
        let parser = RuleInvoiceParser::new();
        let result = parser.parse("Concepto 85,00\nTotal: 100,00", "x.pdf").unwrap();

        assert_eq!(result.record.base_amount, Some(dec("85.00")));
        assert!(result
            .warnings
            .contains(&"Base amount inferred from total".to_string()));
    }

    #[test]
    fn test_empty_text_rejected() {
        let parser = RuleInvoiceParser::new();
        assert!(matches!(parser.parse("  \n\t", "x.pdf"), Err(ExtractionError::EmptyText)));

        let record = parser.extract_record("", "x.pdf");
        assert_eq!(record.invoice_number, "x");
        assert_eq!(record.total_amount, None);
    }

    #[test]
    fn test_amount_window_from_config() {
        let config = ExtractionConfig {
            summary_window_chars: 10,
            ..ExtractionConfig::default()
        };
        let parser = RuleInvoiceParser::from_config(&config);
        let record = parser.extract_record("Total: 55,00\nxxxxxxxxxxxxxxxx", "x.pdf");
        assert_eq!(record.total_amount, None);
    }

    #[test]
    fn test_base_ratio_band_from_builder() {
        let parser = RuleInvoiceParser::new().with_base_ratio_band(dec("0.75"), dec("0.85"));
        let record = parser.extract_record("Concepto 90,00\nOtro 80,00\nTotal: 100,00", "x.pdf");

        assert_eq!(record.base_amount, Some(dec("80.00")));
    }
}
