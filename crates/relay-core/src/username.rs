//! Target username extraction from donor messages.
//!
//! Donors address an in-game player by prefixing their message with the
//! player name in square brackets, e.g. `[Budi123] semangat!`.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static USERNAME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([A-Za-z0-9_]+)\]").expect("username tag pattern is valid"));

/// Returns the bracketed username at the start of `message`, or `fallback`
/// verbatim when there is none.
///
/// Only ASCII letters, digits and underscore are accepted between the
/// brackets. No trimming or case folding is applied, so a leading space
/// disables the tag.
///
/// # Example
///
/// ```
/// use relay_core::extract_username;
///
/// assert_eq!(extract_username("[Budi123] semangat!", "Budi"), "Budi123");
/// assert_eq!(extract_username("semangat!", "Budi"), "Budi");
/// ```
pub fn extract_username<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    USERNAME_TAG
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map_or(fallback, |tag| tag.as_str())
}
