//! Per-class default-note policy
//!
//! Some document classes must always carry a supplemental note in their
//! `class_specific` payload. When the model omits it, the merge step
//! synthesizes one from this table. Which qualifier wins when a payload
//! carries several hints is data (`qualifier_order`), not control flow,
//! so the precedence can change without touching the merge code.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// A hint the class-specific payload can carry, rendered as a
/// parenthetical qualifier appended to the default note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteQualifier {
    /// The document queries by personal identity (`query_mode == "person"`)
    PersonQuery,
    /// The document names a specific policy number (`policy_no`)
    PolicyNumber,
}

impl NoteQualifier {
    /// Render this qualifier from the payload's hints, if present.
    pub fn render(&self, class_specific: &Map<String, Value>) -> Option<String> {
        match self {
            NoteQualifier::PersonQuery => {
                let mode = class_specific.get("query_mode").and_then(Value::as_str)?;
                (mode == "person").then(|| "（依利害關係人身分資料查詢）".to_string())
            }
            NoteQualifier::PolicyNumber => {
                let no = class_specific
                    .get("policy_no")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())?;
                Some(format!("（保單號碼：{no}）"))
            }
        }
    }
}

/// Default-note rule for one document class.
#[derive(Debug, Clone)]
pub struct ClassNoteRule {
    /// Phrase used when the model supplies no note
    pub default_note: String,
    /// Qualifier precedence: the first hint that renders wins
    pub qualifier_order: Vec<NoteQualifier>,
}

impl ClassNoteRule {
    /// Create a rule with the standard person-before-policy precedence.
    pub fn new(default_note: impl Into<String>) -> Self {
        Self {
            default_note: default_note.into(),
            qualifier_order: vec![NoteQualifier::PersonQuery, NoteQualifier::PolicyNumber],
        }
    }

    /// Override the qualifier precedence.
    pub fn with_qualifier_order(mut self, order: Vec<NoteQualifier>) -> Self {
        self.qualifier_order = order;
        self
    }
}

/// The set of document classes requiring a supplemental note.
///
/// Class labels are opaque category strings supplied by the routing layer
/// (in practice, the data directory name the document arrived under).
#[derive(Debug, Clone)]
pub struct NotePolicy {
    rules: HashMap<String, ClassNoteRule>,
}

impl NotePolicy {
    /// An empty policy: no class gains a synthesized note.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule for a class, replacing any existing one.
    pub fn with_rule(mut self, class: impl Into<String>, rule: ClassNoteRule) -> Self {
        self.rules.insert(class.into(), rule);
        self
    }

    /// Look up the rule for a class.
    pub fn rule_for(&self, class: &str) -> Option<&ClassNoteRule> {
        self.rules.get(class)
    }
}

impl Default for NotePolicy {
    /// The built-in rule set for the document classes we reply to.
    fn default() -> Self {
        Self::empty()
            .with_rule(
                "保單查詢",
                ClassNoteRule::new("經查本公司承保資料，查詢結果詳如說明段。"),
            )
            .with_rule(
                "保單註記",
                ClassNoteRule::new("本公司業依來函辦理保單註記事宜。"),
            )
            .with_rule(
                "扣押命令",
                ClassNoteRule::new("本公司將依本命令辦理相關扣押事宜。"),
            )
    }
}
