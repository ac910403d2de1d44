//! JSON Recovery Engine
//!
//! Model responses are expected, but not guaranteed, to contain a single
//! JSON object. They routinely arrive wrapped in commentary, fenced in
//! markdown, or carrying trailing commas. Recovery runs a fixed ladder:
//! strict parse, fence selection, a brace-balance scan for the longest
//! depth-balanced candidate, then a minimal trailing-comma repair. Only
//! exhausting the whole ladder is fatal to the document.

use crate::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

/// Recover the best-candidate JSON object from arbitrary text.
///
/// On failure the original strict-parse error is preserved so the caller
/// can see what the parser actually objected to.
pub fn recover_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let trimmed = text.trim();

    // Fast path: the whole response is the object.
    let direct_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => None,
        Err(e) => Some(e),
    };

    let working = select_fenced_block(trimmed).unwrap_or(trimmed);

    if let Some(candidate) = balanced_candidate(working) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => return Ok(map),
            _ => {
                debug!("candidate failed strict parse, attempting comma repair");
                let repaired = strip_trailing_commas(candidate);
                if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&repaired) {
                    return Ok(map);
                }
            }
        }
    }

    Err(match direct_err {
        Some(e) => ExtractError::UnrecoverableJson(e),
        None => ExtractError::NoJsonObject,
    })
}

/// [`recover_object`] plus a best-effort postmortem dump.
///
/// When recovery fails and `debug_dir` is given, the offending text is
/// persisted there for inspection. The write never masks the failure.
pub fn recover_object_logged(
    text: &str,
    debug_dir: Option<&Path>,
) -> Result<Map<String, Value>, ExtractError> {
    recover_object(text).map_err(|err| {
        if let Some(dir) = debug_dir {
            let path = dir.join(format!("raw_model_{}.txt", Uuid::now_v7()));
            match std::fs::write(&path, text) {
                Ok(()) => warn!("unparseable model output persisted to {}", path.display()),
                Err(io_err) => warn!(
                    "could not persist unparseable model output to {}: {}",
                    path.display(),
                    io_err
                ),
            }
        }
        err
    })
}

/// Pick the working text out of a fenced response.
///
/// A block explicitly tagged `json` wins; otherwise the longest segment
/// produced by splitting on the fence delimiter.
fn select_fenced_block(text: &str) -> Option<&str> {
    if !text.contains("```") {
        return None;
    }
    let segments: Vec<&str> = text.split("```").collect();

    for segment in &segments {
        let body = segment.trim_start();
        let tagged = body
            .get(..4)
            .map(|tag| tag.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if tagged {
            return Some(match body.split_once('\n') {
                Some((_, rest)) => rest,
                None => "",
            });
        }
    }

    segments.into_iter().max_by_key(|s| s.len())
}

/// Scan for the longest depth-balanced `{...}` candidate.
///
/// A small explicit state machine over code points: an in-string flag
/// toggled on unescaped quotes, an escape flag that resets every
/// character and arms only on a backslash while not already armed, and a
/// brace-depth counter. Braces inside quoted strings never affect depth.
/// Ties go to the first candidate found.
fn balanced_candidate(text: &str) -> Option<&str> {
    let mut in_str = false;
    let mut esc = false;
    let mut depth = 0u32;
    let mut start: Option<usize> = None;
    let mut best: Option<(usize, usize)> = None;

    for (i, ch) in text.char_indices() {
        if ch == '"' && !esc {
            in_str = !in_str;
        }
        if in_str {
            esc = ch == '\\' && !esc;
            continue;
        }
        esc = false;

        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start.take() {
                            let span = (s, i + 1);
                            let longer = best
                                .map(|(bs, be)| span.1 - span.0 > be - bs)
                                .unwrap_or(true);
                            if longer {
                                best = Some(span);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    best.map(|(s, e)| text[s..e].trim()).filter(|c| !c.is_empty())
}

static TRAILING_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Minimal syntactic repair: drop commas immediately preceding a closing
/// brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_RE.replace_all(text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_fast_path() {
        let map = recover_object(r#"  {"a": 1, "b": "two"}  "#).unwrap();
        assert_eq!(map["a"], json!(1));
        assert_eq!(map["b"], json!("two"));
    }

    #[test]
    fn test_object_embedded_in_prose_round_trips() {
        let text = "好的，以下是抽取結果：\n{\"agency\": \"某地方法院\", \"targets\": []}\n以上供參考。";
        let map = recover_object(text).unwrap();
        assert_eq!(map["agency"], json!("某地方法院"));
    }

    #[test]
    fn test_braces_inside_strings_do_not_affect_depth() {
        let map = recover_object(r#"prefix {"a":"}"} suffix"#).unwrap();
        assert_eq!(Value::Object(map), json!({"a": "}"}));
    }

    #[test]
    fn test_escaped_quote_does_not_toggle_string_mode() {
        let map = recover_object(r#"x {"a":"say \"hi\" {ok}"} y"#).unwrap();
        assert_eq!(map["a"], json!(r#"say "hi" {ok}"#));
    }

    #[test]
    fn test_longest_of_multiple_candidates_wins() {
        let text = r#"{"a":1} and also {"a":1,"b":2,"c":3}"#;
        let map = recover_object(text).unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        let text = r#"{"a":1} {"b":2}"#;
        let map = recover_object(text).unwrap();
        assert!(map.contains_key("a"));
    }

    #[test]
    fn test_json_tagged_fence_preferred() {
        let text = "some very long prose explaining the answer in detail\n```json\n{\"k\": \"v\"}\n```\ntrailing notes";
        let map = recover_object(text).unwrap();
        assert_eq!(map["k"], json!("v"));
    }

    #[test]
    fn test_untagged_fence_falls_back_to_longest_segment() {
        let text = "hi\n```\n{\"k\": \"v\", \"extra\": \"padding so this segment is longest\"}\n```\nok";
        let map = recover_object(text).unwrap();
        assert_eq!(map["k"], json!("v"));
    }

    #[test]
    fn test_trailing_comma_repair() {
        let map = recover_object(r#"result: {"a": 1, "b": [1, 2,], }"#).unwrap();
        assert_eq!(map["b"], json!([1, 2]));
    }

    #[test]
    fn test_unrecoverable_text_preserves_parse_error() {
        let err = recover_object("the model refused to answer").unwrap_err();
        assert!(matches!(err, ExtractError::UnrecoverableJson(_)));
    }

    #[test]
    fn test_valid_non_object_is_not_an_object() {
        let err = recover_object("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonObject));
    }

    #[test]
    fn test_logged_variant_dumps_offending_text() {
        let dir = tempfile::tempdir().unwrap();
        let err = recover_object_logged("not json", Some(dir.path())).unwrap_err();
        assert!(matches!(err, ExtractError::UnrecoverableJson(_)));

        let dumps: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(dumps.len(), 1);
        let content = std::fs::read_to_string(dumps[0].as_ref().unwrap().path()).unwrap();
        assert_eq!(content, "not json");
    }

    #[test]
    fn test_logged_variant_without_dir_still_errors() {
        assert!(recover_object_logged("not json", None).is_err());
    }

    #[test]
    fn test_balanced_candidate_ignores_unclosed_object() {
        assert_eq!(balanced_candidate(r#"{"a": {"b": 1}"#), None);
    }
}
