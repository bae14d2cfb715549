use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `D-DDDDD-DDDDDDDD`, followed by a non-digit or the end of the text.
static RE_CUSTOMER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d-\d{5}-\d{8})(?:\D|$)").unwrap());

/// Pulls the customer number out of raw email text.
///
/// If several distinct numbers appear, the lexicographically smallest one
/// wins. Returns an empty string when there is none.
pub fn extract_customer_number(text: &str) -> String {
    let matches: BTreeSet<&str> = RE_CUSTOMER_NUMBER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    matches
        .first()
        .map(|s| s.to_string())
        .unwrap_or_default()
}
