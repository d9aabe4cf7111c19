//! Date extraction from receipt text.

use regex::Regex;
use std::sync::OnceLock;

/// Extract the first date-like substring, e.g. `12/31/24` or `1-2-2024`.
///
/// The pattern is loose: day/month order is ambiguous and the numbers are
/// not validated as a real calendar date. The field is reviewed by the user
/// before it is saved.
pub fn extract_date(text: &str) -> Option<String> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| {
        Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").unwrap()
    });

    re.find(text).map(|m| m.as_str().to_string())
}
