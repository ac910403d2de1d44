//! Record merge and validation
//!
//! Reconciles the model's parsed record with what the deterministic
//! recognizers can read straight off the document. Model output wins;
//! the recognizers only backfill blanks. This precedence is merge
//! policy, not a correctness law — the tests pin current behavior.
//!
//! Passes, in order: shape normalization, identity re-validation,
//! deterministic backfill, default-note synthesis. Missing optional
//! fields are never an error; only a payload that is not a JSON object
//! violates the caller contract.

use crate::date::{extract_doc_date, extract_reference_date};
use crate::docno::extract_doc_no;
use crate::error::ExtractError;
use crate::officer::extract_officer;
use crate::phone::extract_phone;
use crate::twid::is_valid_tw_id;
use paperclerk_domain::{NotePolicy, StructuredRecord};
use serde_json::Value;
use tracing::debug;

/// Merge the model's payload with deterministic extraction over the raw
/// document text and enforce the record's shape invariants.
///
/// Errors only if `raw` is not a JSON object; every other defect
/// degrades to an absent or default value.
pub fn merge_and_validate(
    raw: Value,
    doc_text: &str,
    doc_class: &str,
    policy: &NotePolicy,
) -> Result<StructuredRecord, ExtractError> {
    let Value::Object(obj) = raw else {
        return Err(ExtractError::NotAnObject);
    };

    // Shape normalization, including the class_specific string coercion.
    let mut record = StructuredRecord::from_object(obj);

    // Identity numbers: never trust a model-supplied validity flag.
    for person in &mut record.targets {
        person.id_valid = person
            .tw_id
            .as_deref()
            .map(is_valid_tw_id)
            .unwrap_or(false);
    }

    // Deterministic backfill; a present model value always wins.
    if record.officer_role.is_none() && record.officer_name.is_none() {
        let (role, name) = extract_officer(doc_text);
        record.officer_role = role;
        record.officer_name = name;
    }
    if record.contact_phone.is_none() {
        record.contact_phone = extract_phone(doc_text);
    }
    if record.doc_no.is_none() {
        record.doc_no = extract_doc_no(doc_text);
    }
    if record.doc_date.is_none() {
        record.doc_date = extract_doc_date(doc_text);
    }
    if record.reference_date.is_none() {
        record.reference_date = extract_reference_date(doc_text);
    }

    apply_note_policy(&mut record, doc_class, policy);

    Ok(record)
}

/// Synthesize the per-class default note when the class requires one and
/// the model left it blank.
fn apply_note_policy(record: &mut StructuredRecord, doc_class: &str, policy: &NotePolicy) {
    let Some(rule) = policy.rule_for(doc_class) else {
        return;
    };
    if record.note().is_some_and(|n| !n.is_empty()) {
        return;
    }

    let mut note = rule.default_note.clone();
    for qualifier in &rule.qualifier_order {
        if let Some(rendered) = qualifier.render(&record.class_specific) {
            note.push_str(&rendered);
            break;
        }
    }

    debug!(class = doc_class, "synthesized default note");
    record
        .class_specific
        .insert("note".to_string(), Value::String(note));
}
