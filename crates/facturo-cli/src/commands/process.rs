//! Process command - extract fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use facturo_core::invoice::{InvoiceParser, RuleInvoiceParser};
use facturo_core::models::record::{InvoiceRecord, RECORD_COLUMNS};

use super::{ensure_text, load_config, load_document_text};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print fields that were missing or inferred
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = load_document_text(&args.input)?;
    ensure_text(&text, config.pdf.min_text_length)?;

    let source_name = args
        .input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parser = RuleInvoiceParser::from_config(&config.extraction);
    let result = parser.parse(&text, &source_name)?;

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Wrote {} in {:?}",
            style("✓").green(),
            output_path.display(),
            start.elapsed()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)? + "\n"),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(RECORD_COLUMNS)?;
    wtr.write_record(record.to_row())?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let show = |value: &str| if value.is_empty() { "-".to_string() } else { value.to_string() };

    let mut output = String::new();
    output.push_str(&format!("Document: {}\n", record.source_name));
    output.push_str(&format!("Invoice:  {}\n", record.invoice_number));
    output.push_str(&format!("Date:     {}\n", show(&record.invoice_date)));
    output.push_str(&format!("Supplier: {}\n", show(&record.supplier_id)));
    output.push('\n');
    output.push_str(&format!("  Base:  {}\n", or_dash(record.base_amount)));
    output.push_str(&format!("  IVA:   {}\n", or_dash(record.tax_amount)));
    output.push_str(&format!("  Total: {}\n", or_dash(record.total_amount)));
    output
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
