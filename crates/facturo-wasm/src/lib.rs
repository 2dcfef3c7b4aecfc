//! WASM bindings for invoice field extraction.
//!
//! Text extraction happens on the JavaScript side (pdf.js or similar); these
//! bindings take the resulting text and return the extracted record.

use wasm_bindgen::prelude::*;

use facturo_core::invoice::rules::normalize;
use facturo_core::invoice::{InvoiceParser, RuleInvoiceParser};
use facturo_core::models::record::InvoiceRecord;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract invoice fields from document text.
///
/// `source_name` is the document's file name; it doubles as the invoice
/// number when the text carries none.
#[wasm_bindgen]
pub fn extract_invoice_from_text(text: &str, source_name: &str) -> Result<JsValue, JsValue> {
    InvoiceExtractor::new().extract(text, source_name)
}

/// Parse an amount such as "1,00€" or "6,21 EUR". Returns the canonical
/// decimal string, or `undefined` when the input holds no amount.
#[wasm_bindgen]
pub fn normalize_amount(amount: &str) -> Option<String> {
    normalize::normalize_amount(amount).map(|d| d.to_string())
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    parser: RuleInvoiceParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create a new invoice extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: RuleInvoiceParser::new(),
        }
    }

    /// Change how many trailing characters are searched for amounts.
    #[wasm_bindgen]
    pub fn set_summary_window(&mut self, chars: usize) {
        self.parser = self.parser.clone().with_summary_window(chars);
    }

    /// Extract the invoice record.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, source_name: &str) -> Result<JsValue, JsValue> {
        let result = self
            .parser
            .parse(text, source_name)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        serde_wasm_bindgen::to_value(&result.record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get extraction result with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str, source_name: &str) -> Result<JsValue, JsValue> {
        let result = self
            .parser
            .parse(text, source_name)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        #[derive(serde::Serialize)]
        struct ExtractResult {
            record: InvoiceRecord,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            record: result.record,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        };

        serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Extract the record as a JSON string.
    #[wasm_bindgen]
    pub fn extract_json(&self, text: &str, source_name: &str) -> Result<String, JsValue> {
        let record = self
            .parser
            .parse(text, source_name)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .record;

        serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_amount_binding() {
        assert_eq!(normalize_amount("6,21 EUR"), Some("6.21".to_string()));
        assert_eq!(normalize_amount("EUR"), None);
    }
}
