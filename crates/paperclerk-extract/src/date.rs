//! Dual-calendar date resolution
//!
//! Official documents date themselves in the ROC era (`民國113年7月1日`,
//! often without the era marker) or the common era (`2024年7月1日`,
//! `2024/07/01`, `20240701`). Resolution is keyword-anchored: a window
//! around each date label is searched first, the whole text only as a
//! fallback. Every candidate passes through real calendar validation;
//! an impossible day/month is "no match here" and the search moves on.

use crate::window::char_window;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Additive offset from a ROC era year to the common era.
const ROC_ERA_OFFSET: i32 = 1911;

/// Window around a keyword occurrence: chars before its start / after its end.
const WINDOW_BEFORE: usize = 20;
const WINDOW_AFTER: usize = 30;

// An era year must not be preceded by another digit, so the tail of a
// common-era year (`2024年` -> `024年`) is never read as an era year.
static ROC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d])(?:民國)?\s*(\d{2,3})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日").unwrap()
});

static CE_CJK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日").unwrap());

static CE_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})[./\-](\d{1,2})[./\-](\d{1,2})").unwrap());

static CE_COMPACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\d])(20\d{2})(\d{2})(\d{2})(?:[^\d]|$)").unwrap());

static DOC_DATE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("發文日期|發文日|發文時間").unwrap());

static REFERENCE_DATE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("來文日期|來文日|來函日期|來文時間").unwrap());

/// Resolve the document's own issuance date to ISO `YYYY-MM-DD`.
pub fn extract_doc_date(text: &str) -> Option<String> {
    resolve(text, &DOC_DATE_LABEL_RE)
}

/// Resolve the date of the letter being replied to, anchored to
/// inbound-correspondence labels.
pub fn extract_reference_date(text: &str) -> Option<String> {
    resolve(text, &REFERENCE_DATE_LABEL_RE)
}

fn resolve(text: &str, labels: &Regex) -> Option<String> {
    for label in labels.find_iter(text) {
        let win = char_window(text, label.start(), label.end(), WINDOW_BEFORE, WINDOW_AFTER);
        if let Some(iso) = first_date_in(win) {
            return Some(iso);
        }
    }
    first_date_in(text)
}

/// First calendar-valid date in the text, ROC patterns before CE.
fn first_date_in(text: &str) -> Option<String> {
    for caps in ROC_DATE_RE.captures_iter(text) {
        let iso = to_iso(
            parse_i32(&caps[1]).map(|y| y + ROC_ERA_OFFSET),
            parse_u32(&caps[2]),
            parse_u32(&caps[3]),
        );
        if iso.is_some() {
            return iso;
        }
    }

    for re in [&*CE_CJK_RE, &*CE_SEP_RE, &*CE_COMPACT_RE] {
        for caps in re.captures_iter(text) {
            let iso = to_iso(
                parse_i32(&caps[1]),
                parse_u32(&caps[2]),
                parse_u32(&caps[3]),
            );
            if iso.is_some() {
                return iso;
            }
        }
    }

    None
}

/// Calendar-validate and render; `None` for impossible dates.
fn to_iso(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<String> {
    let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_i32(s: &str) -> Option<i32> {
    s.parse().ok()
}

fn parse_u32(s: &str) -> Option<u32> {
    s.parse().ok()
}
