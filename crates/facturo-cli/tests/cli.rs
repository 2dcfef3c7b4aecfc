use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_INVOICE: &str = "Factura: A123\nFecha de factura: 01/02/2024\nBase imponible: 80,00\nIVA: 16,80\nTotal: 96,80\nCIF: B12345678\n";

/// Command with an isolated configuration file holding defaults.
fn facturo(dir: &Path) -> Command {
    let config = dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("facturo").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn documents_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    for (name, content) in files {
        fs::write(docs.join(name), content).unwrap();
    }
    dir
}

#[test]
fn batch_writes_one_row_per_document() {
    let dir = documents_dir(&[
        ("a123.txt", SAMPLE_INVOICE),
        ("INV-2024-07.txt", "Pedido\nConcepto 85,00\nTotal: 100,00\n"),
        ("blank.txt", "   \n"),
    ]);
    let output = dir.path().join("out.csv");

    facturo(dir.path())
        .arg("batch")
        .arg(dir.path().join("docs"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/3 processed"))
        .stdout(predicate::str::contains("Totals detected: 2/2 (100.0%)"))
        .stdout(predicate::str::contains("blank.txt"));

    let content = fs::read_to_string(&output).unwrap();
    let content = content.strip_prefix('\u{feff}').expect("BOM expected");
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(
        lines,
        vec![
            "invoice_number,invoice_date,supplier_id,customer,base_amount,iva,total,source_name",
            "INV-2024-07,,,,85.00,,100.00,INV-2024-07.txt",
            "A123,01/02/2024,B12345678,,80.00,16.80,96.80,a123.txt",
        ]
    );
}

#[test]
fn batch_without_documents_fails() {
    let dir = documents_dir(&[("notes.md", "Total: 1,00")]);

    facturo(dir.path())
        .arg("batch")
        .arg(dir.path().join("docs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn batch_with_only_empty_documents_fails() {
    let dir = documents_dir(&[("empty.txt", "")]);

    facturo(dir.path())
        .arg("batch")
        .arg(dir.path().join("docs"))
        .arg("-o")
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid documents"));

    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn batch_respects_bom_setting() {
    let dir = documents_dir(&[("a.txt", SAMPLE_INVOICE)]);
    fs::write(dir.path().join("config.json"), r#"{"output": {"write_bom": false}}"#).unwrap();
    let output = dir.path().join("out.csv");

    facturo(dir.path())
        .arg("batch")
        .arg(dir.path().join("docs"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("invoice_number,"));
}

#[test]
fn process_prints_json_record() {
    let dir = documents_dir(&[("a123.txt", SAMPLE_INVOICE)]);

    facturo(dir.path())
        .arg("process")
        .arg(dir.path().join("docs").join("a123.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoice_number": "A123""#))
        .stdout(predicate::str::contains(r#""total_amount": "96.80""#))
        .stdout(predicate::str::contains(r#""customer": """#));
}

#[test]
fn process_text_format_with_warnings() {
    let dir = documents_dir(&[("INV-2024-07.txt", "Total: 12,00\n")]);

    facturo(dir.path())
        .arg("process")
        .arg(dir.path().join("docs").join("INV-2024-07.txt"))
        .args(["--format", "text", "--show-warnings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice:  INV-2024-07"))
        .stderr(predicate::str::contains("Invoice number taken from file name"));
}

#[test]
fn process_rejects_empty_text() {
    let dir = documents_dir(&[("empty.txt", "\n\n")]);

    facturo(dir.path())
        .arg("process")
        .arg(dir.path().join("docs").join("empty.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text extracted"));
}

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();

    facturo(dir.path())
        .args(["config", "set", "extraction.summary_window_chars", "500"])
        .assert()
        .success();

    facturo(dir.path())
        .args(["config", "get", "extraction.summary_window_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500"));
}

#[test]
fn config_set_rejects_invalid_band() {
    let dir = tempfile::tempdir().unwrap();

    facturo(dir.path())
        .args(["config", "set", "extraction.base_ratio_min", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base ratio band"));
}
