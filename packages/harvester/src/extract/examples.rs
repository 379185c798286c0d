//! Splitting the examples field into separate examples.

use crate::types::Examples;

/// Phrases where a semicolon is part of the sentence, not a delimiter.
pub const SEMICOLON_EXCEPTIONS: [&str; 2] = ["; however", "instrument;"];

/// Split examples text into individual examples.
///
/// Semicolons delimit examples unless the text contains one of
/// [`SEMICOLON_EXCEPTIONS`]; otherwise line breaks do. Items are trimmed
/// and empty items dropped.
///
/// # Examples
/// ```
/// use spectrum_harvester::extract::split_examples;
/// use spectrum_harvester::types::Examples;
///
/// assert_eq!(
///     split_examples("A; B; C"),
///     Examples::Many(vec!["A".into(), "B".into(), "C".into()])
/// );
/// assert_eq!(split_examples("A"), Examples::Single("A".into()));
/// ```
#[must_use]
pub fn split_examples(text: &str) -> Examples {
    let text = text.trim();
    if text.is_empty() {
        return Examples::Empty;
    }

    let delimiter = if text.contains(';') && !SEMICOLON_EXCEPTIONS.iter().any(|p| text.contains(p)) {
        ';'
    } else if text.contains('\n') {
        '\n'
    } else {
        return Examples::Single(text.to_string());
    };

    let items: Vec<String> = text
        .split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();

    match items.len() {
        0 => Examples::Empty,
        _ => Examples::Many(items),
    }
}
