//! Text normalization for search
//!
//! Titles and names are stored alongside a normalized form that the search
//! endpoint matches against. The same function runs on the incoming query,
//! so both sides of the comparison are guaranteed to be bit-identical.

use deunicode::deunicode_char;

/// Normalizes text for substring search: accents are stripped to their
/// nearest ASCII equivalent and the result is lowercased.
///
/// Characters with no ASCII equivalent are passed through unchanged rather
/// than dropped, so searches containing them can still match.
///
/// # Examples
///
/// ```
/// use filmrank::text::normalize;
///
/// assert_eq!(normalize("Přelet nad kukaččím hnízdem"), "prelet nad kukaccim hnizdem");
/// assert_eq!(normalize("MATRIX"), "matrix");
/// ```
pub fn normalize(text: &str) -> String {
    let transliterated: String = text
        .chars()
        .map(|c| match deunicode_char(c) {
            Some(ascii) => ascii.to_string(),
            None => c.to_string(),
        })
        .collect();

    transliterated.to_lowercase()
}
