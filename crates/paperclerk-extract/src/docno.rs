//! Reference-number recognition
//!
//! An official document names itself either with an explicit label
//! (`發文字號：北院字第1130001234號`) or bare, as an administrative-unit
//! token followed by the `…字第…號` structure. The labeled form is tried
//! first at each position; the first match in document order wins.

use once_cell::sync::Lazy;
use regex::Regex;

static DOC_NO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:發文字號|文號)[：:]\s*([^\n\r，。、]{4,30})",
        r"|([一二三四五六七八九十○零〇台臺北新高桃竹苗中彰投雲嘉南高屏宜花東金馬\w]{1,6}字第[^\s，。、]{3,20}號)",
    ))
    .unwrap()
});

/// Trailing punctuation stripped from a captured reference number.
const TRAILING_PUNCT: [char; 5] = ['，', '。', '；', '、', ' '];

/// Extract the document's official reference number.
pub fn extract_doc_no(text: &str) -> Option<String> {
    for caps in DOC_NO_RE.captures_iter(text) {
        let group = caps.get(1).or_else(|| caps.get(2));
        if let Some(m) = group {
            let cleaned = m.as_str().trim().trim_matches(TRAILING_PUNCT.as_slice());
            if !cleaned.is_empty() {
                return Some(cleaned.to_string());
            }
        }
    }
    None
}
