//! Identifier and text normalization.
//!
//! Every display name that becomes a map key goes through [`to_identifier`],
//! and every piece of page text goes through [`normalize_text`] before it is
//! stored.

use unicode_normalization::UnicodeNormalization;

/// Convert a display name into a mapping key.
///
/// Lower-cases the name and replaces space, hyphen, slash and apostrophe
/// with an underscore.
///
/// # Examples
/// ```
/// use spectrum_harvester::text::to_identifier;
///
/// assert_eq!(to_identifier("Object name"), "object_name");
/// assert_eq!(to_identifier("Owner's name/title"), "owner_s_name_title");
/// ```
#[must_use]
pub fn to_identifier(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '-' | '/' | '\'' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Replace typographic punctuation with ASCII equivalents.
///
/// The text is first put in NFC form so that composed and decomposed
/// accents serialize identically.
///
/// # Examples
/// ```
/// use spectrum_harvester::text::normalize_text;
///
/// assert_eq!(normalize_text("\u{2018}Object\u{2019} \u{2013} name"), "'Object' - name");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.nfc()
        .map(|c| match c {
            '\u{2013}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}
