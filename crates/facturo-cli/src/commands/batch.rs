//! Batch processing command: one CSV row per document.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::{glob_with, MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use facturo_core::invoice::{ExtractionResult, InvoiceParser, RuleInvoiceParser};
use facturo_core::models::config::OutputConfig;
use facturo_core::models::record::{InvoiceRecord, RECORD_COLUMNS};

use super::{ensure_text, extension_of, load_config, load_document_text, SUPPORTED_EXTENSIONS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory of documents, or a glob pattern
    #[arg(required = true)]
    input: String,

    /// Output CSV file (default: <prefix>_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

/// Outcome of processing a single document.
struct ProcessResult {
    path: PathBuf,
    result: Result<ExtractionResult, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = collect_documents(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.input);
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(RuleInvoiceParser::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let min_text_length = config.pdf.min_text_length;
    let mut tasks = JoinSet::new();

    for path in files {
        let parser = Arc::clone(&parser);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let worker_path = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                process_document(&worker_path, parser.as_ref(), min_text_length)
            })
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| format!("{:#}", e)));
            ProcessResult { path, result }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined?;
        let name = display_name(&result.path);
        match &result.result {
            Ok(_) => pb.println(format!("  {} {}", style("✓").green(), name)),
            Err(e) => {
                warn!("Failed to process {}: {}", result.path.display(), e);
                pb.println(format!("  {} {}", style("✗").red(), name));
            }
        }
        pb.inc(1);
        results.push(result);
    }
    pb.finish_and_clear();

    let processed = results.len();
    let mut records: Vec<InvoiceRecord> = results
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .map(|r| r.record.clone())
        .collect();
    records.sort_by(|a, b| a.source_name.cmp(&b.source_name));

    let mut failed: Vec<(&Path, &str)> = results
        .iter()
        .filter_map(|r| r.result.as_ref().err().map(|e| (r.path.as_path(), e.as_str())))
        .collect();
    failed.sort();

    if records.is_empty() {
        anyhow::bail!("No valid documents among {} processed", processed);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config.output));
    write_records_csv(&output_path, &records, config.output.write_bom)?;

    // Print summary
    println!();
    println!(
        "{} {}/{} processed → {} in {:?}",
        style("✓").green(),
        records.len(),
        processed,
        output_path.display(),
        start.elapsed()
    );

    let with_total = records.iter().filter(|r| r.total_amount.is_some()).count();
    println!(
        "   Totals detected: {}/{} ({:.1}%)",
        with_total,
        records.len(),
        with_total as f64 / records.len() as f64 * 100.0
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Documents to process, sorted by path. A directory is scanned (not
/// recursively) for supported extensions; anything else is used as a glob.
fn collect_documents(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let input_path = Path::new(input);
    let pattern = if input_path.is_dir() {
        let escaped = Pattern::escape(&input_path.to_string_lossy());
        format!("{}/*", escaped.trim_end_matches('/'))
    } else {
        input.to_string()
    };

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files: Vec<PathBuf> = glob_with(&pattern, options)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| SUPPORTED_EXTENSIONS.contains(&extension_of(p).as_str()))
        .collect();
    files.sort();

    debug!("Pattern {} matched {} documents", pattern, files.len());
    Ok(files)
}

fn process_document(
    path: &Path,
    parser: &RuleInvoiceParser,
    min_text_length: usize,
) -> anyhow::Result<ExtractionResult> {
    let text = load_document_text(path)?;
    ensure_text(&text, min_text_length)?;
    Ok(parser.parse(&text, &display_name(path))?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn default_output_path(output: &OutputConfig) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{}_{}.csv", output.file_prefix, timestamp))
}

/// Write records as CSV with the fixed column order.
pub fn write_records_csv(
    path: &Path,
    records: &[InvoiceRecord],
    write_bom: bool,
) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    if write_bom {
        file.write_all(UTF8_BOM)?;
    }

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(RECORD_COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
