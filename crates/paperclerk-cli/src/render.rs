//! Reply-letter rendering.
//!
//! Turns a validated record into the draft reply text. The renderer
//! trusts the record's invariants (dates are full ISO strings, targets
//! carry a computed validity flag) and never re-validates them.

use chrono::{Datelike, Local, NaiveDate};
use paperclerk_domain::StructuredRecord;
use std::fmt::Write;

/// ROC era offset used for display dates in the letter body.
const ROC_ERA_OFFSET: i32 = 1911;

/// Render the reply letter for a validated record.
///
/// The display date prefers the document's own date and falls back to
/// today, in ROC-era notation as official correspondence expects.
pub fn render_reply(record: &StructuredRecord) -> String {
    let display = display_date(record.doc_date.as_deref());
    let agency = record.agency.as_deref().unwrap_or("來函機關");

    let mut out = String::new();

    let _ = writeln!(out, "發文日期：中華民國{}", display);
    let _ = writeln!(out, "受文者：{}", agency);
    out.push('\n');

    match &record.doc_no {
        Some(doc_no) => {
            let _ = writeln!(out, "主旨：復 {} {}函，如說明，請查照。", agency, doc_no);
        }
        None => {
            let _ = writeln!(out, "主旨：復 {} 來函，如說明，請查照。", agency);
        }
    }

    out.push_str("說明：\n");
    let mut item = SectionCounter::new();

    match &record.reference_date {
        Some(reference) => {
            let _ = writeln!(
                out,
                "{}復 {} {}來函。",
                item.next(),
                agency,
                display_date(Some(reference.as_str()))
            );
        }
        None => {
            let _ = writeln!(out, "{}復 {} 來函。", item.next(), agency);
        }
    }

    if let Some(note) = record.note().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "{}{}", item.next(), note);
    }

    if !record.targets.is_empty() {
        let _ = writeln!(out, "{}本案相對人核對結果：", item.next());
        for person in &record.targets {
            let name = person.name.as_deref().unwrap_or("（姓名未載明）");
            match &person.tw_id {
                Some(tw_id) => {
                    let mark = if person.id_valid { "檢核相符" } else { "檢核不符" };
                    let _ = writeln!(out, "    {}（身分證字號：{}，{}）", name, tw_id, mark);
                }
                None => {
                    let _ = writeln!(out, "    {}（身分證字號未載明）", name);
                }
            }
        }
    }

    if !record.policies.is_empty() {
        let _ = writeln!(out, "{}相關保單號碼：{}。", item.next(), record.policies.join("、"));
    }

    out.push('\n');
    if let (Some(role), Some(name)) = (&record.officer_role, &record.officer_name) {
        let _ = writeln!(out, "原函{}：{}", role, name);
    } else if let Some(role) = &record.officer_role {
        let _ = writeln!(out, "原函承辦：{}", role);
    }
    if let Some(phone) = &record.contact_phone {
        let _ = writeln!(out, "原函聯絡電話：{}", phone);
    }

    out
}

/// Chinese enumeration for the 說明 section.
struct SectionCounter {
    index: usize,
}

impl SectionCounter {
    const NUMERALS: [&'static str; 10] =
        ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

    fn new() -> Self {
        Self { index: 0 }
    }

    fn next(&mut self) -> String {
        let numeral = Self::NUMERALS.get(self.index).copied().unwrap_or("十");
        self.index += 1;
        format!("{}、", numeral)
    }
}

/// `113年7月1日`-style display form, from ISO or from today.
fn display_date(iso: Option<&str>) -> String {
    let date = iso
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive());
    format!(
        "{}年{:02}月{:02}日",
        date.year() - ROC_ERA_OFFSET,
        date.month(),
        date.day()
    )
}
