#![deny(missing_docs)]

//! # Output
//!
//! Renders a document as pretty JSON or YAML.

use crate::error::{AppError, AppResult};
use openapiv3::OpenAPI;
use std::path::Path;
use std::str::FromStr;

/// Serialization format of the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl OutputFormat {
    /// The format implied by a path's extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// The file extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(AppError::General(format!(
                "Unsupported output format '{}', expected json or yaml",
                other
            ))),
        }
    }
}

/// Serializes the document. JSON output ends with a newline.
pub fn render(document: &OpenAPI, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
    }
}
