//! Company identifier normalization.
//!
//! Callers paste company websites in many shapes (`https://acme.io/`,
//! `www.acme.io`, ` acme.io `). The lookup service expects a bare domain, so
//! the value is trimmed and at most one scheme-like prefix and one trailing
//! slash are removed.

use regex::Regex;
use std::sync::OnceLock;

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(www\.|https?://)").expect("valid prefix regex"))
}

/// Normalizes a company identifier before it is forwarded upstream.
///
/// Only one prefix is stripped: `https://www.acme.io` becomes `www.acme.io`.
/// Matching is case-sensitive.
///
/// # Examples
///
/// ```
/// use email_finder_relay::normalize::normalize_company;
///
/// assert_eq!(normalize_company("https://Example.com/"), "Example.com");
/// assert_eq!(normalize_company("www.foo.org"), "foo.org");
/// ```
pub fn normalize_company(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = prefix_pattern().replace(trimmed, "");
    without_prefix
        .strip_suffix('/')
        .unwrap_or(&without_prefix)
        .to_string()
}
