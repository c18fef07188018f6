//! Token-level spelling correction against a literal replacement table

use indexmap::IndexMap;

/// Replace whitespace-separated tokens found in `corrections`
///
/// Lookup is case-insensitive (table keys are stored lowercase); unmatched
/// tokens keep their original case. The result is joined with single spaces.
pub fn correct(text: &str, corrections: &IndexMap<String, String>) -> String {
    text.split_whitespace()
        .map(|token| {
            corrections
                .get(&token.to_lowercase())
                .map(String::as_str)
                .unwrap_or(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
