#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads an interface description, builds the OpenAPI document and writes
//! it to a file or stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use apidoc_core::{
    build_document, parse_api_json, parse_api_spec, parse_api_yaml, render, ApiSpec, OutputFormat,
};

use crate::error::{CliError, CliResult};

/// Marker for stdin/stdout.
const STDIO: &str = "-";

/// Arguments for document generation.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Interface description (JSON or YAML); `-` reads stdin.
    #[clap(short, long, env = "APIDOC_INPUT", default_value = STDIO)]
    pub input: String,

    /// Output path; `-` writes to stdout. A `.json`, `.yaml` or `.yml`
    /// extension selects the format.
    #[clap(short, long, env = "APIDOC_OUTPUT", default_value = "openapi")]
    pub output: String,

    /// Serialization format (`json` or `yaml`) when the output path has no
    /// known extension. Defaults to json.
    #[clap(short, long, env = "APIDOC_FORMAT")]
    pub format: Option<OutputFormat>,
}

/// Where the document goes and how it is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// `None` means stdout.
    pub path: Option<PathBuf>,
    /// Serialization format.
    pub format: OutputFormat,
}

/// Decides the output path and format.
///
/// An extension on the path wins over `--format`; otherwise the format's
/// extension is appended, except for stdout.
pub fn resolve_output(output: &str, format: Option<OutputFormat>) -> OutputTarget {
    if output == STDIO {
        return OutputTarget {
            path: None,
            format: format.unwrap_or_default(),
        };
    }
    let path = PathBuf::from(output);
    match OutputFormat::from_path(&path) {
        Some(format) => OutputTarget {
            path: Some(path),
            format,
        },
        None => {
            let format = format.unwrap_or_default();
            OutputTarget {
                path: Some(PathBuf::from(format!("{}.{}", output, format.extension()))),
                format,
            }
        }
    }
}

/// Reads and parses the interface description.
pub fn load_spec(input: &str) -> CliResult<ApiSpec> {
    if input == STDIO {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(parse_api_spec(&content)?);
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(CliError::General(format!(
            "Input file not found: {:?}",
            path
        )));
    }
    let content = fs::read_to_string(path)?;
    let spec = match OutputFormat::from_path(path) {
        Some(OutputFormat::Yaml) => parse_api_yaml(&content)?,
        Some(OutputFormat::Json) => parse_api_json(&content)?,
        None => parse_api_spec(&content)?,
    };
    Ok(spec)
}

/// Executes document generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let spec = load_spec(&args.input)?;
    let generated = build_document(&spec);
    let target = resolve_output(&args.output, args.format);
    let rendered = render(&generated.document, target.format)?;

    match &target.path {
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            println!("Generated OpenAPI document at {:?}", path);
        }
    }

    if !generated.warnings.is_empty() {
        tracing::warn!(
            count = generated.warnings.len(),
            "document generated with skipped declarations"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_output() {
        assert_eq!(
            resolve_output("api.yml", Some(OutputFormat::Json)),
            OutputTarget {
                path: Some(PathBuf::from("api.yml")),
                format: OutputFormat::Yaml,
            }
        );
        assert_eq!(
            resolve_output("openapi", Some(OutputFormat::Yaml)),
            OutputTarget {
                path: Some(PathBuf::from("openapi.yaml")),
                format: OutputFormat::Yaml,
            }
        );
        assert_eq!(
            resolve_output("openapi", None).path,
            Some(PathBuf::from("openapi.json"))
        );
        assert_eq!(resolve_output("-", Some(OutputFormat::Yaml)).path, None);
    }

    #[test]
    fn test_execute_writes_yaml() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("api.yaml");
        fs::write(
            &input,
            "info:\n  title: Demo\n  version: \"1\"\nservice:\n  name: demo\n",
        )
        .unwrap();
        let output = dir.path().join("out/doc");

        let args = GenerateArgs {
            input: input.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            format: Some(OutputFormat::Yaml),
        };
        execute(&args).unwrap();

        let written = fs::read_to_string(dir.path().join("out/doc.yaml")).unwrap();
        assert!(written.contains("openapi: 3.0.3"));
        assert!(written.contains("title: Demo"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let args = GenerateArgs {
            input: dir.path().join("missing.json").to_string_lossy().to_string(),
            output: "-".to_string(),
            format: None,
        };
        assert!(matches!(execute(&args), Err(CliError::General(_))));
    }
}
