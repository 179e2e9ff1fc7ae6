//! Markdown Document Renderer - writes a completed form as a markdown file.
//!
//! # File Layout
//!
//! ```text
//! {output_dir}/
//! ├── pan_card_application_1b4e28ba-....md
//! └── passport_application_6fa459ea-....md
//! ```
//!
//! # Atomic Writes
//!
//! 1. Write content to `{name}.md.tmp`
//! 2. Sync to disk
//! 3. Rename to `{name}.md`
//!
//! A crash mid-write leaves at most a stray `.tmp` file, never a truncated
//! document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::ports::{DocumentRenderer, RenderError, RenderRequest, RenderedDocument};

/// Renders documents as markdown under one output directory.
#[derive(Debug, Clone)]
pub struct MarkdownDocumentRenderer {
    output_dir: PathBuf,
}

impl MarkdownDocumentRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn filename(request: &RenderRequest) -> String {
        format!("{}_{}.md", request.schema_id, request.document_id)
    }

    /// Builds the document body.
    pub fn render_markdown(request: &RenderRequest) -> String {
        let meta = &request.metadata;
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", escape(&request.display_name)));
        out.push_str("| | |\n|---|---|\n");
        out.push_str(&format!("| Issuing authority | {} |\n", escape(&meta.authority)));
        if let Some(fee) = &meta.fee {
            out.push_str(&format!("| Fee | {} |\n", escape(fee)));
        }
        if let Some(time) = &meta.processing_time {
            out.push_str(&format!("| Processing time | {} |\n", escape(time)));
        }
        out.push_str(&format!("| Reference | {} |\n", request.document_id));
        out.push_str(&format!("| Completed | {} |\n", request.completed_at.to_rfc3339()));

        out.push_str("\n## Applicant details\n\n| Field | Answer |\n|---|---|\n");
        for entry in &request.entries {
            let answer = if entry.answer.value.is_empty() {
                "_not provided_".to_string()
            } else {
                escape(&entry.answer.value)
            };
            out.push_str(&format!("| {} | {} |\n", escape(&entry.label), answer));
        }

        out
    }

    async fn write_atomic(&self, filename: &str, content: &str) -> Result<(), RenderError> {
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            RenderError::io(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let final_path = self.output_dir.join(filename);
        let temp_path = self.output_dir.join(format!("{}.tmp", filename));

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            RenderError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        let written = async {
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &final_path).await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(RenderError::io(format!(
                "Failed to write {}: {}",
                final_path.display(),
                e
            )));
        }
        Ok(())
    }
}

/// Keeps user text from breaking the table layout.
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

#[async_trait]
impl DocumentRenderer for MarkdownDocumentRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderedDocument, RenderError> {
        if request.entries.is_empty() {
            return Err(RenderError::InvalidRequest(
                "no answers to render".to_string(),
            ));
        }

        let filename = Self::filename(&request);
        let content = Self::render_markdown(&request);
        self.write_atomic(&filename, &content).await?;

        debug!(filename = %filename, session_id = %request.session_id, "Document rendered");
        Ok(RenderedDocument {
            filename,
            size_bytes: content.len() as u64,
        })
    }
}
