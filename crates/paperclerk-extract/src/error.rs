//! Error types for extraction

use thiserror::Error;

/// Errors that can occur while recovering and merging a record.
///
/// Pattern-match misses are not errors; the recognizers return `Option`
/// and callers apply their own fallback policy. Only the two conditions
/// below are fatal to a document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No JSON object could be recovered from the model output after all
    /// repair strategies; carries the original strict-parse failure.
    #[error("unrecoverable model output: {0}")]
    UnrecoverableJson(#[source] serde_json::Error),

    /// The model output parsed, but nothing in it was a JSON object.
    #[error("model output contains no JSON object")]
    NoJsonObject,

    /// Caller contract violation: the payload handed to merge was not a
    /// JSON object.
    #[error("model payload is not a JSON object")]
    NotAnObject,
}
