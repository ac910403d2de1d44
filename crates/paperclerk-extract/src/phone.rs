//! Phone recognition and normalization
//!
//! Matches `(area)exchange-subscriber[ext]` shapes as they appear in
//! official correspondence: `(02) 2345-6789`, `03-1234567轉123`,
//! `0212345678#123或456`. A document often carries several numbers
//! (agency switchboard, fax, the handling officer's line); keyword
//! proximity decides which one is the contact number.

use crate::window::char_window;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\(?(0\d{1,2})\)?[ \-]?(\d{3,4})[ \-]?(\d{3,4})(?:[ \-]*(?:轉|ext\.?|#|分機)[ \-]?([0-9\-、或/]{1,10}))?",
    )
    .unwrap()
});

/// Context keywords in priority order; an earlier keyword wins across
/// all matches in the document.
const CONTEXT_KEYWORDS: [&str; 5] = ["電話", "聯絡", "分機", "承辦", "書記官"];

/// Characters of context inspected on each side of a match.
const CONTEXT_CHARS: usize = 15;

/// Extract the document's contact phone number in canonical form.
///
/// Scans every phone-like match, then walks the keyword list in priority
/// order returning the first match with that keyword nearby. With no
/// keyword context anywhere, the first match in document order wins.
pub fn extract_phone(text: &str) -> Option<String> {
    let matches: Vec<Captures> = PHONE_RE.captures_iter(text).collect();
    if matches.is_empty() {
        return None;
    }

    for keyword in CONTEXT_KEYWORDS {
        for caps in &matches {
            let span = caps.get(0).expect("group 0 always present");
            let context = char_window(text, span.start(), span.end(), CONTEXT_CHARS, CONTEXT_CHARS);
            if context.contains(keyword) {
                return Some(normalize(caps));
            }
        }
    }

    Some(normalize(&matches[0]))
}

/// Render a match as `area-exchangesubscriber[#ext]`, canonicalizing
/// extension separators to a single `或`.
fn normalize(caps: &Captures) -> String {
    let area = &caps[1];
    let exchange = &caps[2];
    let subscriber = &caps[3];
    let base = format!("{area}-{exchange}{subscriber}");

    match caps.get(4) {
        Some(ext) => {
            let ext = ext.as_str().replace('、', "或").replace('/', "或");
            format!("{base}#{ext}")
        }
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_area_code() {
        assert_eq!(
            extract_phone("電話：(02)2345-6789").as_deref(),
            Some("02-23456789")
        );
    }

    #[test]
    fn test_extension_markers() {
        assert_eq!(
            extract_phone("聯絡電話 02-12345678轉123").as_deref(),
            Some("02-12345678#123")
        );
        assert_eq!(
            extract_phone("電話02-12345678#123").as_deref(),
            Some("02-12345678#123")
        );
        assert_eq!(
            extract_phone("電話 (03) 123-4567 分機 22").as_deref(),
            Some("03-1234567#22")
        );
    }

    #[test]
    fn test_extension_separators_canonicalized() {
        assert_eq!(
            extract_phone("電話02-12345678轉123或456").as_deref(),
            Some("02-12345678#123或456")
        );
        assert_eq!(
            extract_phone("電話02-12345678轉123、456").as_deref(),
            Some("02-12345678#123或456")
        );
        assert_eq!(
            extract_phone("電話02-12345678轉123/456").as_deref(),
            Some("02-12345678#123或456")
        );
    }

    #[test]
    fn test_keyword_proximity_beats_document_order() {
        let text =
            "傳真：(02)1111-2222。本案相關程序疑義如說明段所載，如有其他疑問請洽承辦人，電話：(03)3333-4444。";
        assert_eq!(extract_phone(text).as_deref(), Some("03-33334444"));
    }

    #[test]
    fn test_no_keyword_falls_back_to_first_match() {
        let text = "本件另載明 (07)5555-6666 及 (02)7777-8888 兩組號碼。";
        assert_eq!(extract_phone(text).as_deref(), Some("07-55556666"));
    }

    #[test]
    fn test_no_phone_returns_none() {
        assert_eq!(extract_phone("本件無任何聯絡方式。"), None);
    }

    #[test]
    fn test_keyword_window_is_measured_in_characters() {
        // The keyword sits well within 15 characters of the match even
        // though the CJK prefix is far more than 15 bytes away.
        let text = "說明：本案承辦股別如右，電話 (02) 2345 6789，敬請查照。";
        assert_eq!(extract_phone(text).as_deref(), Some("02-23456789"));
    }
}
