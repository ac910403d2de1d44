//! Handling-officer recognition
//!
//! Letters name their handling officer as `承辦人：王小明` or just carry
//! the role (`書記官`) with the name elsewhere. The name hint is loose:
//! 2 to 4 characters that are not whitespace or punctuation, so obvious
//! non-names (the word 電話 bleeding in from the next field) are
//! filtered after the match.

use once_cell::sync::Lazy;
use regex::Regex;

static OFFICER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(書記官|承辦人|聯絡人|承辦|股員|股長|專員)[：:]\s*([^\s，、()（）:：]{2,4})")
        .unwrap()
});

static ROLE_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("書記官|承辦人|聯絡人|承辦|股員|股長|專員").unwrap());

/// Extract the handling officer's role and, when present, name.
///
/// A labeled `role：name` pair wins; a bare role mention is kept with no
/// name. Returns `(role, name)`, either of which may be absent.
pub fn extract_officer(text: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = OFFICER_RE.captures(text) {
        let role = caps[1].to_string();
        let name = caps[2].to_string();
        let name = (!name.contains("電話")).then_some(name);
        return (Some(role), name);
    }

    if let Some(m) = ROLE_ONLY_RE.find(text) {
        return (Some(m.as_str().to_string()), None);
    }

    (None, None)
}
