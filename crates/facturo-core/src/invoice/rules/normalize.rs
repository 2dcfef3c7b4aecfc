//! Normalization of raw text spans into identifier, date and amount values.
//!
//! All functions here are total: malformed input yields an empty string or
//! `None`, never an error.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Keep only word characters and hyphens ("Nº FV-12/3" -> "NºFV-123").
pub fn normalize_identifier(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Keep digits and `/ . -`, truncated to 10 characters.
pub fn normalize_date(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '/' | '.' | '-'))
        .take(10)
        .collect()
}

/// Parse an amount written as `1,00€`, `6,21 EUR` or `9.03`.
///
/// The comma is always read as the decimal separator, so mixed thousand
/// separators such as `1.234,56` do not parse and yield `None`.
pub fn normalize_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .replace("EUR", "")
        .chars()
        .filter(|c| *c != '€' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    parse_decimal(&cleaned)
}

/// Parse a string of ASCII digits with at most one dot. Accepts `5.` and `.5`.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let (integer_part, fraction_part) = s.split_once('.').unwrap_or((s, ""));
    if fraction_part.contains('.') {
        return None;
    }
    if integer_part.is_empty() && fraction_part.is_empty() {
        return None;
    }

    let integer_part = if integer_part.is_empty() { "0" } else { integer_part };
    let canonical = if fraction_part.is_empty() {
        integer_part.to_string()
    } else {
        format!("{}.{}", integer_part, fraction_part)
    };

    Decimal::from_str(&canonical).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  A123 "), "A123");
        assert_eq!(normalize_identifier("FV/2024/001"), "FV2024001");
        assert_eq!(normalize_identifier("INV-2024_07."), "INV-2024_07");
        assert_eq!(normalize_identifier("Nº7"), "Nº7");
        assert_eq!(normalize_identifier(""), "");
        assert_eq!(normalize_identifier("#/:"), "");
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("01/02/2024"), "01/02/2024");
        assert_eq!(normalize_date(" 15.01.2024 "), "15.01.2024");
        assert_eq!(normalize_date("2024-01-15T10:00"), "2024-01-15");
        assert_eq!(normalize_date("01/02/2024123"), "01/02/2024");
        assert_eq!(normalize_date("sin fecha"), "");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_normalize_amount_currency_notations() {
        assert_eq!(normalize_amount("1,00€"), Some(dec("1.00")));
        assert_eq!(normalize_amount("6,21 EUR"), Some(dec("6.21")));
        assert_eq!(normalize_amount("9.03€"), Some(dec("9.03")));
        assert_eq!(normalize_amount("€ 1 234,50"), Some(dec("1234.50")));
        assert_eq!(normalize_amount("(96,80)"), Some(dec("96.80")));
    }

    #[test]
    fn test_normalize_amount_rejects_garbage() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("EUR"), None);
        assert_eq!(normalize_amount("."), None);
        assert_eq!(normalize_amount(",,"), None);
        assert_eq!(normalize_amount("1.234,56"), None);
        assert_eq!(normalize_amount("99999999999999999999999999999999999"), None);
    }

    #[test]
    fn test_normalize_amount_lenient_dots() {
        assert_eq!(normalize_amount("5."), Some(dec("5")));
        assert_eq!(normalize_amount(",50"), Some(dec("0.50")));
    }

    #[test]
    fn test_normalize_amount_idempotent() {
        for raw in ["1,00€", "6,21 EUR", "1 234,56", "0,5", "12.", "100"] {
            let once = normalize_amount(raw).unwrap();
            assert_eq!(normalize_amount(&once.to_string()), Some(once), "input {raw:?}");
        }
    }
}
