//! Rule-based field extractors for Spanish invoices.

pub mod amounts;
pub mod dates;
pub mod normalize;
pub mod patterns;
pub mod tax_id;

pub use amounts::{trailing_window, AmountCandidate, AmountExtractor, AmountField, InvoiceAmounts};
pub use dates::{extract_invoice_date, DateExtractor};
pub use normalize::{normalize_amount, normalize_date, normalize_identifier};
pub use patterns::*;
pub use tax_id::{extract_supplier_id, TaxIdExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value extracted from a span of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the scanned text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
