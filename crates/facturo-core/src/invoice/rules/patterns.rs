//! Common regex patterns for Spanish invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that looks like a number in a summary block: "96,80", "1.234", "2024"
    pub static ref CANDIDATE_AMOUNT: Regex = Regex::new(
        r"[0-9.,]{3,}(?:[.,][0-9]{2})?"
    ).unwrap();

    // Totals (highest priority)
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?is)(?:Total\s*(?:factura|a pagar|final|en EUR)?|TOTAL|Importe total)\s*[:\-()]*\s*([0-9.,]+)"
    ).unwrap();

    pub static ref TOTAL_UPPER: Regex = Regex::new(
        r"(?is)TOTAL\s*[:\-()]*\s*([0-9.,]+)"
    ).unwrap();

    // Taxable base
    pub static ref BASE_LABELED: Regex = Regex::new(
        r"(?is)(?:Base\s*(?:imponible|imp\.?)|Subtotal|Neto?|IMPORTE\s*\(base imponible\))\s*[:\-()]*\s*([0-9.,]+)"
    ).unwrap();

    pub static ref BASE_PARENTHESIZED: Regex = Regex::new(
        r"(?is)base imponible\).*?([0-9.,]+)"
    ).unwrap();

    // IVA
    pub static ref TAX_LABELED: Regex = Regex::new(
        r"(?is)(?:IVA?|I\.V\.A\.?|IMPUESTOS\s*\(21|Impuesto|Cuota IVA)\s*[:\-()]*\s*([0-9.,]+)"
    ).unwrap();

    pub static ref TAX_RATE_QUALIFIED: Regex = Regex::new(
        r"(?is)\(21(?:\.00)?%?\s*IVA?\).*?([0-9.,]+)"
    ).unwrap();

    pub static ref TAX_DOTTED: Regex = Regex::new(
        r"(?is)I\.V\.A\..*?([0-9.,]+)"
    ).unwrap();

    // Invoice number, tried in this order
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"N(?:\.°|º)?\s*de?\s*factura\s*[:\-]?\s*(\w+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_NUMERO: Regex = Regex::new(
        r"Número\s*[:\-]?\s*(\w+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_FACTURA: Regex = Regex::new(
        r"Factura[:\-]?\s*(\w+)"
    ).unwrap();

    // Issue date
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"Fecha\s+de?\s*(?:factura|facturación|emisión)\s*[:\-]?\s*([0-9/.\-]{8,10})"
    ).unwrap();

    // Spanish tax identifier (CIF/NIF): letter, 8 digits, optional control letter
    pub static ref SUPPLIER_TAX_ID: Regex = Regex::new(
        r"(?i)(?:CIF|NIF|IVA:)\s*[:\-]?\s*([A-Z][0-9]{8}[A-Z]?)"
    ).unwrap();
}
