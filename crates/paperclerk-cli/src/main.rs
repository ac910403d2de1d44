//! Paperclerk - drafts replies to official correspondence.
//!
//! LLM extraction first, deterministic validation second, one reply
//! file per input document.

use clap::Parser;
use paperclerk_cli::{render_reply, Cli, CliError, Config, PromptRouter, Result};
use paperclerk_domain::NotePolicy;
use paperclerk_extract::{merge_and_validate, recover_object_logged};
use paperclerk_llm::OllamaProvider;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Log to stderr; stdout stays clean for shell pipelines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let endpoint = cli.endpoint.clone().unwrap_or_else(|| config.endpoint.clone());
    let model = cli.model.clone().unwrap_or_else(|| config.model.clone());

    let provider =
        OllamaProvider::with_timeout(endpoint, model, Duration::from_secs(config.timeout_secs))
            .with_temperature(config.temperature);
    let router = PromptRouter::new(&cli.prompts_dir);
    let policy = NotePolicy::default();

    fs::create_dir_all(&cli.out_dir)?;

    let documents = discover_documents(&cli.data_dir)?;
    if documents.is_empty() {
        warn!(
            "no documents found under {} (expected <data>/<class>/<name>.txt)",
            cli.data_dir.display()
        );
        return Ok(());
    }

    let mut failed = 0usize;
    for (path, doc_class) in &documents {
        info!("processing {} (class: {})", path.display(), doc_class);
        match process_document(path, doc_class, &provider, &router, &policy, &cli.out_dir).await
        {
            Ok(out_path) => info!("written {}", out_path.display()),
            Err(e) => {
                // Fatal to this document only; the batch keeps going.
                warn!("{} failed: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    info!("done: {} ok, {} failed", documents.len() - failed, failed);
    Ok(())
}

/// One document through the whole pipeline: prompt, model call, JSON
/// recovery (with postmortem dump), merge, render, write.
async fn process_document(
    path: &Path,
    doc_class: &str,
    provider: &OllamaProvider,
    router: &PromptRouter,
    policy: &NotePolicy,
    out_dir: &Path,
) -> Result<PathBuf> {
    let raw_text = fs::read_to_string(path)?;
    let prompt = router.route(&raw_text, doc_class)?;

    let response = provider.generate(&prompt).await?;
    let raw = recover_object_logged(&response, Some(out_dir))?;
    let record = merge_and_validate(Value::Object(raw), &raw_text, doc_class, policy)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::InvalidInput(format!("unusable file name: {}", path.display())))?;
    let out_path = out_dir.join(format!("{stem}.reply.txt"));
    fs::write(&out_path, render_reply(&record))?;
    Ok(out_path)
}

/// Find input documents: every `*.txt` one level below the data dir,
/// with the parent directory name as the document class.
fn discover_documents(data_dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut documents = Vec::new();
    if !data_dir.is_dir() {
        return Ok(documents);
    }

    for class_entry in fs::read_dir(data_dir)? {
        let class_dir = class_entry?.path();
        if !class_dir.is_dir() {
            continue;
        }
        let Some(doc_class) = class_dir.file_name().and_then(|n| n.to_str()).map(String::from)
        else {
            continue;
        };

        for doc_entry in fs::read_dir(&class_dir)? {
            let doc_path = doc_entry?.path();
            if doc_path.extension().is_some_and(|ext| ext == "txt") {
                documents.push((doc_path, doc_class.clone()));
            }
        }
    }

    documents.sort();
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_documents_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("保單查詢")).unwrap();
        fs::write(dir.path().join("保單查詢").join("a.txt"), "內文").unwrap();
        fs::write(dir.path().join("保單查詢").join("ignore.md"), "x").unwrap();
        fs::create_dir(dir.path().join("通知函")).unwrap();
        fs::write(dir.path().join("通知函").join("b.txt"), "內文").unwrap();
        fs::write(dir.path().join("top-level.txt"), "x").unwrap();

        let documents = discover_documents(dir.path()).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents
            .iter()
            .any(|(p, c)| p.ends_with("a.txt") && c == "保單查詢"));
        assert!(documents
            .iter()
            .any(|(p, c)| p.ends_with("b.txt") && c == "通知函"));
    }

    #[test]
    fn test_missing_data_dir_is_empty_not_error() {
        let documents = discover_documents(Path::new("/nonexistent/paperclerk")).unwrap();
        assert!(documents.is_empty());
    }
}
