//! Input normalization applied before a record is stored

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace run pattern is valid"));

/// Trims the value and collapses every whitespace run into one space.
pub fn sanitize_input(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input.trim(), " ").into_owned()
}
