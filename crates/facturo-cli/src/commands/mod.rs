//! CLI sub-commands and the document loading they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::debug;

use facturo_core::models::config::FacturoConfig;
use facturo_core::pdf::PdfExtractor;

/// File extensions the extractor can read text from.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Load the configuration from `--config`, else the default location, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturoConfig> {
    if let Some(path) = config_path {
        return Ok(FacturoConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(FacturoConfig::from_file(&default_path)?)
    } else {
        Ok(FacturoConfig::default())
    }
}

/// Lower-cased extension of `path`, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Raw text of a document. PDFs go through text extraction, `.txt` files are
/// taken as already-extracted text.
pub fn load_document_text(path: &Path) -> anyhow::Result<String> {
    let extension = extension_of(path);

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            Ok(PdfExtractor::text_from_bytes(&data)?)
        }
        "txt" => Ok(fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Check that extraction produced enough text to be worth parsing.
pub fn ensure_text(text: &str, min_text_length: usize) -> anyhow::Result<()> {
    let length = text.chars().filter(|c| !c.is_whitespace()).count();
    if length < min_text_length.max(1) {
        anyhow::bail!("No text extracted ({} characters)", length);
    }
    Ok(())
}
