//! Citation Markers
//!
//! Assistant answers cite their sources inline as literal `[n]` markers.
//! Surfaces must present them as superscript annotations without losing the
//! digits, and the rewrite has to happen *before* markdown parsing so the
//! markdown pass never mistakes a marker for a link reference.

use std::sync::OnceLock;

use regex::Regex;

/// Matches a literal citation marker: `[` digits `]`.
fn citation_regex() -> &'static Regex {
    static CITATION: OnceLock<Regex> = OnceLock::new();
    CITATION.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("citation pattern is valid"))
}

/// Rewrite `[n]` citation markers into superscript annotations.
///
/// `[1]` becomes `⁽¹⁾` and `[23]` becomes `⁽²³⁾`. The superscript
/// parentheses keep adjacent citations apart: `[1][2]` reads `⁽¹⁾⁽²⁾`,
/// not the same as `[12]`. Text without markers passes through unchanged;
/// non-numeric brackets like `[foo]` are left alone.
#[must_use]
pub fn rewrite_citation_markers(text: &str) -> String {
    citation_regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("⁽{}⁾", superscript_digits(&caps[1]))
        })
        .into_owned()
}

/// Map a run of ASCII digits to their superscript forms.
fn superscript_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}
