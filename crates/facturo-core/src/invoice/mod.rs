//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, InvoiceParser, RuleInvoiceParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
