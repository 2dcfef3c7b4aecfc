//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FacturoError, Result};

/// Main configuration for the facturo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturoConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Tabular output configuration.
    pub output: OutputConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of trailing characters searched for summary amounts.
    pub summary_window_chars: usize,

    /// Lowest base/total ratio accepted by the coherence fallback.
    pub base_ratio_min: Decimal,

    /// Highest base/total ratio accepted by the coherence fallback.
    pub base_ratio_max: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            summary_window_chars: 3000,
            base_ratio_min: Decimal::new(70, 2),
            base_ratio_max: Decimal::new(95, 2),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Documents with fewer non-whitespace characters are reported as failed.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 1 }
    }
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix of the generated CSV file name (a timestamp is appended).
    pub file_prefix: String,

    /// Write a UTF-8 byte order mark so spreadsheet tools detect the encoding.
    pub write_bom: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: "facturas".to_string(),
            write_bom: true,
        }
    }
}

impl FacturoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let ex = &self.extraction;
        if ex.summary_window_chars == 0 {
            return Err(FacturoError::Config(
                "extraction.summary_window_chars must be greater than 0".to_string(),
            ));
        }
        if ex.base_ratio_min.is_sign_negative() || ex.base_ratio_min > ex.base_ratio_max {
            return Err(FacturoError::Config(format!(
                "invalid base ratio band [{}, {}]",
                ex.base_ratio_min, ex.base_ratio_max
            )));
        }
        Ok(())
    }
}
