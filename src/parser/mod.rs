//! Receipt text parsing - field extraction from recognized text.

mod date;
mod total;

/// Fallback vendor name when the recognized text has no non-blank line.
const UNKNOWN_VENDOR: &str = "Unknown";

/// Fields extracted from raw recognized text. Extraction is pure and never
/// fails: a field with no match is the empty string and is left for the
/// user to correct during review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFields {
    /// Best-effort vendor name, "Unknown" when the text is blank.
    pub vendor: String,
    /// First date-like substring, e.g. `12/31/24`. Not validated.
    pub date: String,
    /// Amount following the first monetary keyword, e.g. `12.34`.
    pub total: String,
}

impl ReceiptFields {
    /// Parse recognized receipt text (possibly empty).
    pub fn parse(text: &str) -> Self {
        Self {
            vendor: extract_vendor(text),
            date: date::extract_date(text).unwrap_or_default(),
            total: total::extract_total(text).unwrap_or_default(),
        }
    }
}

/// Heuristic vendor name: the first non-blank line of the receipt, trimmed.
fn extract_vendor(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(UNKNOWN_VENDOR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_is_first_non_blank_line() {
        let fields = ReceiptFields::parse("\n   \n  Corner Cafe  \n123 Main St\n");
        assert_eq!(fields.vendor, "Corner Cafe");
    }

    #[test]
    fn empty_text_yields_sentinel_vendor_and_empty_fields() {
        let fields = ReceiptFields::parse("");
        assert_eq!(fields.vendor, "Unknown");
        assert_eq!(fields.date, "");
        assert_eq!(fields.total, "");
    }

    #[test]
    fn full_receipt_extracts_all_fields() {
        let text = "Corner Cafe\n12/31/24\n2x coffee 7.00\nTotal: 12.34\nThank you!";
        let fields = ReceiptFields::parse(text);
        assert_eq!(fields.vendor, "Corner Cafe");
        assert_eq!(fields.date, "12/31/24");
        assert_eq!(fields.total, "12.34");
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "Grocer\n01-02-2024\nBalance 5.00\nTotal 9.99";
        assert_eq!(ReceiptFields::parse(text), ReceiptFields::parse(text));
    }
}
