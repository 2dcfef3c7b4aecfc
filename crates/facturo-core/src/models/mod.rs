//! Data models: extracted records and pipeline configuration.

pub mod config;
pub mod record;

pub use config::{ExtractionConfig, FacturoConfig, OutputConfig, PdfConfig};
pub use record::{InvoiceRecord, RECORD_COLUMNS};
