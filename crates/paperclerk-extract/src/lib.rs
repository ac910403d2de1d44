//! Paperclerk Extract
//!
//! Recovers a structured record from noisy model output and raw document
//! text. This crate owns the two coupled halves of that job:
//!
//! - **JSON recovery**: pulling the best-candidate JSON object out of an
//!   arbitrary model response (prose, code fences, trailing commas,
//!   multiple candidates) and repairing common syntax defects.
//! - **Deterministic recognizers**: a checksum-validated national-ID
//!   check, a phone normalizer, a dual-calendar date resolver, a
//!   reference-number recognizer and a handling-officer recognizer, all
//!   pure functions over the document text.
//!
//! The merge step reconciles the two sources: model output wins, the
//! recognizers backfill what it missed, and shape invariants (object-typed
//! `class_specific`, derived `id_valid`, per-class default notes) are
//! enforced exactly once.
//!
//! # Example Usage
//!
//! ```
//! use paperclerk_domain::NotePolicy;
//! use paperclerk_extract::{merge_and_validate, recover_object};
//! use serde_json::Value;
//!
//! # fn example() -> Result<(), paperclerk_extract::ExtractError> {
//! let response = "Here you go:\n{\"agency\": \"臺灣臺北地方法院\", \"targets\": []}";
//! let raw = recover_object(response)?;
//!
//! let doc_text = "發文日期：113年7月1日 承辦人：王小明 電話：(02)2345-6789";
//! let record = merge_and_validate(
//!     Value::Object(raw),
//!     doc_text,
//!     "通知函",
//!     &NotePolicy::default(),
//! )?;
//! assert_eq!(record.doc_date.as_deref(), Some("2024-07-01"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod date;
mod docno;
mod error;
mod json;
mod merge;
mod officer;
mod phone;
mod twid;
mod window;

#[cfg(test)]
mod tests;

pub use date::{extract_doc_date, extract_reference_date};
pub use docno::extract_doc_no;
pub use error::ExtractError;
pub use json::{recover_object, recover_object_logged};
pub use merge::merge_and_validate;
pub use officer::extract_officer;
pub use phone::extract_phone;
pub use twid::is_valid_tw_id;
