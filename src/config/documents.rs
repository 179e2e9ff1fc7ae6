//! Document output and form catalogue configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where rendered documents are written
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl DocumentsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputDir);
        }
        Ok(())
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./generated")
}

/// Form catalogue source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormsConfig {
    /// YAML catalogue replacing the built-in one
    pub catalogue_path: Option<PathBuf>,
}
