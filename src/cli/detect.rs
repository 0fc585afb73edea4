//! Configuration format auto-detection

use super::args::ConfigFormat;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Detected format with the method that found it
#[derive(Debug, Clone, Copy)]
pub struct FormatDetection {
    /// Detected or specified format
    pub format: ConfigFormat,
    /// Detection method used
    pub method: DetectionMethod,
}

/// Method used to detect the configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Detect the format of a configuration whose text is `contents`
pub fn detect_format(
    path: &Path,
    contents: &str,
    user_format: Option<ConfigFormat>,
) -> FormatDetection {
    if let Some(format) = user_format {
        return FormatDetection {
            format,
            method: DetectionMethod::UserSpecified,
        };
    }

    if let Ok(format) = detect_by_extension(path) {
        return FormatDetection {
            format,
            method: DetectionMethod::Extension,
        };
    }

    FormatDetection {
        format: detect_by_content(contents),
        method: DetectionMethod::Content,
    }
}

/// Detect format by file extension
fn detect_by_extension(path: &Path) -> Result<ConfigFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .context("No file extension")?;

    Ok(match ext.to_lowercase().as_str() {
        "conf" | "cfg" | "txt" | "text" => ConfigFormat::Text,
        #[cfg(feature = "serialization")]
        "json" => ConfigFormat::Json,
        _ => bail!("Unknown file extension: {}", ext),
    })
}

/// Detect format by looking at the first significant character
#[cfg(feature = "serialization")]
fn detect_by_content(contents: &str) -> ConfigFormat {
    if contents.trim_start().starts_with('{') {
        ConfigFormat::Json
    } else {
        ConfigFormat::Text
    }
}

/// Without JSON support every configuration is text
#[cfg(not(feature = "serialization"))]
fn detect_by_content(_contents: &str) -> ConfigFormat {
    ConfigFormat::Text
}
