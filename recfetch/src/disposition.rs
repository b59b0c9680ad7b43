//! `Content-Disposition` filename extraction.
//!
//! Servers attach a suggested filename to recording downloads via
//! `Content-Disposition: attachment; filename="cam3-20260812.mp4"`. The core
//! never acts on it; callers (the CLI) use it to name the output file when no
//! explicit path was given.

use std::sync::OnceLock;

use regex::Regex;

/// Matches the `filename=` parameter, with or without surrounding quotes.
fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // filename=   - parameter name
        // "?          - optional opening quote
        // ([^";]+)    - the filename itself (no quotes or separators)
        // "?          - optional closing quote
        Regex::new(r#"filename="?([^";]+)"?"#).unwrap()
    })
}

/// Extract the suggested filename from a `Content-Disposition` header value.
///
/// Returns `None` when the header carries no `filename=` parameter.
pub fn attachment_filename(header: &str) -> Option<String> {
    filename_pattern()
        .captures(header)
        .map(|captures| captures[1].to_string())
}
