//! Document adapters - rendering completed forms and reclaiming the files.
//!
//! - `MarkdownDocumentRenderer` - writes a completed form as markdown, atomically
//! - `LocalFileLifecycle` - deletes artifacts of expired sessions

mod local_file_lifecycle;
mod markdown_renderer;

pub use local_file_lifecycle::LocalFileLifecycle;
pub use markdown_renderer::MarkdownDocumentRenderer;
