//! Flat invoice record, one per processed document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column headers of the tabular export, in output order.
pub const RECORD_COLUMNS: [&str; 8] = [
    "invoice_number",
    "invoice_date",
    "supplier_id",
    "customer",
    "base_amount",
    "iva",
    "total",
    "source_name",
];

/// Fields extracted from a single invoice document.
///
/// `invoice_number` and `source_name` are always populated; every other
/// field is empty or `None` when nothing usable was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Normalized invoice identifier, or the file stem when no label matched.
    pub invoice_number: String,

    /// Issue date as printed (digits and `/ . -` only, at most 10 chars).
    pub invoice_date: String,

    /// Supplier tax identifier (CIF/NIF).
    pub supplier_id: String,

    /// Customer name. No rule populates it yet.
    pub customer: String,

    /// Taxable base.
    pub base_amount: Option<Decimal>,

    /// Tax (IVA) amount.
    pub tax_amount: Option<Decimal>,

    /// Invoice total.
    pub total_amount: Option<Decimal>,

    /// Name of the originating document.
    pub source_name: String,
}

impl InvoiceRecord {
    /// Row values in [`RECORD_COLUMNS`] order. Absent amounts become empty cells.
    pub fn to_row(&self) -> [String; 8] {
        [
            self.invoice_number.clone(),
            self.invoice_date.clone(),
            self.supplier_id.clone(),
            self.customer.clone(),
            format_amount(self.base_amount),
            format_amount(self.tax_amount),
            format_amount(self.total_amount),
            self.source_name.clone(),
        ]
    }

    /// Names of the fields that came out empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.invoice_date.is_empty() {
            missing.push("invoice_date");
        }
        if self.supplier_id.is_empty() {
            missing.push("supplier_id");
        }
        if self.base_amount.is_none() {
            missing.push("base_amount");
        }
        if self.tax_amount.is_none() {
            missing.push("tax_amount");
        }
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        missing
    }
}

fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}
