//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - Normalization of identifiers, dates and amounts found in invoice text
//! - Summary amount extraction (total, taxable base, IVA) with a ratio fallback
//! - Assembly of one flat record per document
//! - PDF text extraction (feature `native`)

pub mod error;
pub mod invoice;
pub mod models;
#[cfg(feature = "native")]
pub mod pdf;

pub use error::{ExtractionError, FacturoError, PdfError, Result};
pub use invoice::{ExtractionResult, InvoiceParser, RuleInvoiceParser};
pub use models::config::FacturoConfig;
pub use models::record::{InvoiceRecord, RECORD_COLUMNS};
#[cfg(feature = "native")]
pub use pdf::{PdfExtractor, PdfProcessor};
