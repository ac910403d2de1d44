//! Prompt routing: core extraction prompt plus per-class add-ons.
//!
//! Each document class may carry an add-on prompt with supplemental
//! rules (what to put in `class_specific`, class-specific phrasing).
//! The add-on is appended to the core prompt under a header giving it
//! equal-or-higher priority, exactly as the downstream model expects.

use crate::error::{CliError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Name of the core extraction prompt file inside the prompts directory.
const CORE_PROMPT_FILE: &str = "core_extract.prompt";

/// Placeholder in the core prompt replaced by the document text.
const TEXT_PLACEHOLDER: &str = "{{TEXT}}";

const ADDON_HEADER: &str = "\n\n【以下為本類別的補充規則（同等或更高優先權）】\n";

/// Builds the full prompt for a document from template files on disk.
#[derive(Debug, Clone)]
pub struct PromptRouter {
    prompts_dir: PathBuf,
}

impl PromptRouter {
    /// Create a router over a prompts directory.
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
        }
    }

    /// Build the prompt for one document: core template with the text
    /// substituted, plus the class add-on when one exists.
    pub fn route(&self, text: &str, doc_class: &str) -> Result<String> {
        let core_path = self.prompts_dir.join(CORE_PROMPT_FILE);
        let core = fs::read_to_string(&core_path).map_err(|e| {
            CliError::Config(format!(
                "cannot read core prompt {}: {}",
                core_path.display(),
                e
            ))
        })?;
        let core = core.replace(TEXT_PLACEHOLDER, text);

        let addon_path = self
            .prompts_dir
            .join("addons")
            .join(format!("{doc_class}.prompt"));
        if addon_path.exists() {
            info!("add-on found for class '{}': {}", doc_class, addon_path.display());
            let addon = fs::read_to_string(&addon_path)?;
            Ok(format!("{core}{ADDON_HEADER}{addon}"))
        } else {
            info!("no add-on for class '{}'", doc_class);
            Ok(core)
        }
    }
}
