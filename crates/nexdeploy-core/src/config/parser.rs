//! Config parser with helpful error messages

use std::path::Path;

use super::schema::DeployConfig;
use crate::{Error, Result};

/// Format of a configuration file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// TOML for `.toml`, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Load and parse a configuration file.
pub fn load_config(path: &Path) -> Result<DeployConfig> {
    if !path.is_file() {
        return Err(Error::config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config_str(&content, ConfigFormat::from_path(path)).map_err(|message| {
        Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        }
    })
}

/// Parse configuration content in the given format.
///
/// The error is a human-readable message with the offending line in context.
pub fn parse_config_str(
    content: &str,
    format: ConfigFormat,
) -> std::result::Result<DeployConfig, String> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
            let line = e.line();
            if line == 0 {
                e.to_string()
            } else {
                format!("error at line {}:\n{}\n\n{}", line, line_context(content, line), e)
            }
        }),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| enhance_toml_error(e, content)),
    }
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> String {
    let Some(span) = error.span() else {
        return error.message().to_string();
    };
    let line = content[..span.start.min(content.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1;
    format!(
        "error at line {}:\n{}\n\n{}",
        line,
        line_context(content, line),
        error.message()
    )
}

/// Context lines around an error
fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());
    if start >= end {
        return String::new();
    }

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
