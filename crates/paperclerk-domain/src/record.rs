//! The structured record produced from one processed document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person the document concerns.
///
/// The raw `tw_id` value is preserved unchanged for audit; `id_valid` is
/// always derived by the checksum validator and never trusted from the
/// model, so deserialization defaults it to `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Name as written in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// National ID number, raw and unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tw_id: Option<String>,

    /// Whether `tw_id` passes the checksum (derived, never model-supplied)
    #[serde(default)]
    pub id_valid: bool,
}

impl Person {
    /// Lift a person entry out of a model-supplied JSON value.
    ///
    /// Returns `None` for anything that is not a JSON object; entries the
    /// model mangles are dropped rather than failing the document.
    pub fn from_value(value: &Value) -> Option<Person> {
        let obj = value.as_object()?;
        Some(Person {
            name: string_field(obj, "name"),
            tw_id: string_field(obj, "tw_id"),
            id_valid: false,
        })
    }
}

/// The central field mapping: parsed model output, normalized by the
/// merge step, consumed read-only by the reply renderer.
///
/// Shape invariants after merge:
/// - `class_specific` is always a JSON object, never a string or null
/// - every target's `id_valid` has been recomputed
/// - date fields are either full `YYYY-MM-DD` strings or `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRecord {
    /// Issuing agency of the inbound letter
    pub agency: Option<String>,
    /// Official reference number (發文字號)
    pub doc_no: Option<String>,
    /// Issuance date of the inbound letter, ISO `YYYY-MM-DD`
    pub doc_date: Option<String>,
    /// Date of the letter being replied to, ISO `YYYY-MM-DD`
    pub reference_date: Option<String>,
    /// Handling officer's role (承辦人, 書記官, ...)
    pub officer_role: Option<String>,
    /// Handling officer's name
    pub officer_name: Option<String>,
    /// Contact phone in canonical `area-local[#ext]` form
    pub contact_phone: Option<String>,
    /// Persons the document concerns
    pub targets: Vec<Person>,
    /// Policy numbers mentioned in the document
    pub policies: Vec<String>,
    /// Per-class payload, including the supplemental `note`
    pub class_specific: Map<String, Value>,
    /// Model-supplied fields outside the known schema, preserved verbatim
    pub extra: Map<String, Value>,
}

impl StructuredRecord {
    /// Lift a record out of a model-supplied JSON object.
    ///
    /// Every field is read leniently: a missing or wrongly-typed value
    /// degrades to its empty form instead of failing the document. A
    /// `class_specific` that arrives as an encoded string is parsed back
    /// into an object; anything unparseable becomes an empty object.
    pub fn from_object(mut obj: Map<String, Value>) -> StructuredRecord {
        let targets = match obj.remove("targets") {
            Some(Value::Array(items)) => {
                items.iter().filter_map(Person::from_value).collect()
            }
            _ => Vec::new(),
        };

        let policies = match obj.remove("policies") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        };

        let class_specific = lift_class_specific(obj.remove("class_specific"));

        StructuredRecord {
            agency: take_string(&mut obj, "agency"),
            doc_no: take_string(&mut obj, "doc_no"),
            doc_date: take_string(&mut obj, "doc_date"),
            reference_date: take_string(&mut obj, "reference_date"),
            officer_role: take_string(&mut obj, "officer_role"),
            officer_name: take_string(&mut obj, "officer_name"),
            contact_phone: take_string(&mut obj, "contact_phone"),
            targets,
            policies,
            class_specific,
            extra: obj,
        }
    }

    /// Serialize the record back to a JSON object, extra fields included.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        put_string(&mut obj, "agency", &self.agency);
        put_string(&mut obj, "doc_no", &self.doc_no);
        put_string(&mut obj, "doc_date", &self.doc_date);
        put_string(&mut obj, "reference_date", &self.reference_date);
        put_string(&mut obj, "officer_role", &self.officer_role);
        put_string(&mut obj, "officer_name", &self.officer_name);
        put_string(&mut obj, "contact_phone", &self.contact_phone);
        obj.insert(
            "targets".to_string(),
            serde_json::to_value(&self.targets).unwrap_or(Value::Array(Vec::new())),
        );
        obj.insert(
            "policies".to_string(),
            Value::Array(self.policies.iter().cloned().map(Value::String).collect()),
        );
        obj.insert(
            "class_specific".to_string(),
            Value::Object(self.class_specific.clone()),
        );
        for (k, v) in &self.extra {
            obj.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Value::Object(obj)
    }

    /// The supplemental note carried in `class_specific`, if any.
    pub fn note(&self) -> Option<&str> {
        self.class_specific.get("note").and_then(Value::as_str)
    }
}

/// Coerce a model-supplied `class_specific` into a guaranteed object.
fn lift_class_specific(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|s| !s.is_empty())
}

fn take_string(obj: &mut Map<String, Value>, key: &str) -> Option<String> {
    match obj.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn put_string(obj: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(s) = value {
        obj.insert(key.to_string(), Value::String(s.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_lift_full_record() {
        let record = StructuredRecord::from_object(as_map(json!({
            "agency": "臺灣臺北地方法院",
            "doc_no": "北院字第1130001234號",
            "doc_date": "2024-07-01",
            "targets": [{"name": "王小明", "tw_id": "A123456789"}],
            "policies": ["P-2024-0001"],
            "class_specific": {"note": "既有備註"}
        })));

        assert_eq!(record.agency.as_deref(), Some("臺灣臺北地方法院"));
        assert_eq!(record.doc_date.as_deref(), Some("2024-07-01"));
        assert_eq!(record.targets.len(), 1);
        assert_eq!(record.targets[0].tw_id.as_deref(), Some("A123456789"));
        assert_eq!(record.policies, vec!["P-2024-0001".to_string()]);
        assert_eq!(record.note(), Some("既有備註"));
    }

    #[test]
    fn test_lift_tolerates_wrong_types() {
        let record = StructuredRecord::from_object(as_map(json!({
            "agency": 42,
            "doc_no": null,
            "targets": "not a list",
            "policies": [1, 2, "P-1"],
        })));

        assert_eq!(record.agency, None);
        assert_eq!(record.doc_no, None);
        assert!(record.targets.is_empty());
        assert_eq!(record.policies, vec!["P-1".to_string()]);
    }

    #[test]
    fn test_lift_drops_malformed_target_entries() {
        let record = StructuredRecord::from_object(as_map(json!({
            "targets": [{"name": "甲"}, "乙", 3, {"tw_id": "A123456789"}]
        })));

        assert_eq!(record.targets.len(), 2);
        assert_eq!(record.targets[0].name.as_deref(), Some("甲"));
        assert_eq!(record.targets[1].tw_id.as_deref(), Some("A123456789"));
    }

    #[test]
    fn test_class_specific_string_is_parsed() {
        let record = StructuredRecord::from_object(as_map(json!({
            "class_specific": "{\"note\":\"x\"}"
        })));

        assert_eq!(record.note(), Some("x"));
    }

    #[test]
    fn test_class_specific_garbage_becomes_empty_object() {
        for cs in [json!("not json at all"), json!(null), json!(7), json!(["a"])] {
            let record =
                StructuredRecord::from_object(as_map(json!({ "class_specific": cs })));
            assert!(record.class_specific.is_empty());
        }
    }

    #[test]
    fn test_empty_strings_degrade_to_absent() {
        let record = StructuredRecord::from_object(as_map(json!({
            "doc_no": "",
            "contact_phone": ""
        })));

        assert_eq!(record.doc_no, None);
        assert_eq!(record.contact_phone, None);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let record = StructuredRecord::from_object(as_map(json!({
            "agency": "某機關",
            "summary": "模型附帶的摘要",
        })));

        let value = record.to_value();
        assert_eq!(value["summary"], json!("模型附帶的摘要"));
        assert_eq!(value["agency"], json!("某機關"));
    }

    #[test]
    fn test_id_valid_is_never_lifted_from_input() {
        let record = StructuredRecord::from_object(as_map(json!({
            "targets": [{"tw_id": "A123456789", "id_valid": true}]
        })));

        assert!(!record.targets[0].id_valid);
    }
}
