//! Paperclerk CLI - batch driver for the document-reply pipeline.
//!
//! Walks a data directory laid out as `<data>/<class>/<name>.txt`, runs
//! each document through prompt routing, the model call, JSON recovery
//! and the merge step, renders a reply letter, and writes it next to the
//! others in the output directory. A document that fails JSON recovery
//! is logged and skipped; the batch always completes.

pub mod cli;
pub mod config;
pub mod error;
pub mod prompt;
pub mod render;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use prompt::PromptRouter;
pub use render::render_reply;
