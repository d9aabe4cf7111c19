//! Total amount extraction from receipt text.

use regex::Regex;
use std::sync::OnceLock;

/// Extract the total amount: the first decimal number with two fraction
/// digits following one of the monetary keywords (`Total`, `Amount Due`,
/// `Grand Total`, `Balance`), case-insensitively, with any non-digit
/// characters in between.
///
/// First match in document order wins. On a receipt with several monetary
/// lines no attempt is made to prefer the largest or last amount.
pub fn extract_total(text: &str) -> Option<String> {
    static TOTAL_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOTAL_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:Total|Amount Due|Grand Total|Balance)[^\d]*(\d+\.\d{2})").unwrap()
    });

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_total_with_separator() {
        assert_eq!(extract_total("Total: 12.34"), Some("12.34".to_string()));
        assert_eq!(extract_total("Total    $ 12.34"), Some("12.34".to_string()));
    }

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(extract_total("TOTAL 8.50"), Some("8.50".to_string()));
        assert_eq!(extract_total("amount due: 3.99"), Some("3.99".to_string()));
    }

    #[test]
    fn all_keywords_match() {
        assert_eq!(extract_total("Grand Total 20.00"), Some("20.00".to_string()));
        assert_eq!(extract_total("Balance 5.00"), Some("5.00".to_string()));
    }

    #[test]
    fn first_keyword_in_document_order_wins() {
        let text = "Balance 5.00\nitems...\nTotal 9.99";
        assert_eq!(extract_total(text), Some("5.00".to_string()));
    }

    #[test]
    fn amount_may_sit_on_the_next_line() {
        assert_eq!(extract_total("Total\n$\n12.34"), Some("12.34".to_string()));
    }

    #[test]
    fn requires_two_fraction_digits() {
        assert_eq!(extract_total("Total 12"), None);
        // Only the two-fraction-digit prefix is captured.
        assert_eq!(extract_total("Total 12.345"), Some("12.34".to_string()));
    }

    #[test]
    fn no_keyword_yields_none() {
        assert_eq!(extract_total("coffee 4.50\nmuffin 3.25"), None);
        assert_eq!(extract_total(""), None);
    }
}
