//! Configuration for report generation.
//!
//! Settings are read from `xcreport.json`. Every key is optional; command
//! line flags override whatever the file sets.

use std::path::Path;

use serde::{Deserialize, Serialize};
use xcreport_report::{AttachmentRelocation, RenderingMode};

use crate::error::{Result, XcReportError};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "xcreport.json";

/// Default file name of the HTML document.
fn default_report_file_name() -> String {
    "index.html".to_string()
}

/// Default file name of the JUnit XML output.
fn default_junit_file_name() -> String {
    "report.junit".to_string()
}

/// Default file name of the JSON summary.
fn default_json_file_name() -> String {
    "report.json".to_string()
}

/// Main configuration for xcreport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory reports are written to.
    ///
    /// `None` means the parent directory of the first result bundle.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Whether payloads are linked as files or inlined as data URIs.
    #[serde(default)]
    pub rendering_mode: RenderingMode,

    /// How per-test reports take their attachment files.
    #[serde(default)]
    pub attachment_relocation: AttachmentRelocation,

    /// File name of every HTML document.
    #[serde(default = "default_report_file_name")]
    pub report_file_name: String,

    /// File name of the JUnit XML output.
    #[serde(default = "default_junit_file_name")]
    pub junit_file_name: String,

    /// File name of the JSON summary.
    #[serde(default = "default_json_file_name")]
    pub json_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            rendering_mode: RenderingMode::default(),
            attachment_relocation: AttachmentRelocation::default(),
            report_file_name: default_report_file_name(),
            junit_file_name: default_junit_file_name(),
            json_file_name: default_json_file_name(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Returns the default configuration when no `xcreport.json` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            XcReportError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `xcreport.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `XcReportError::ConfigParseError` if the file cannot be read
    /// or contains invalid JSON or enum values.
    ///
    /// Returns `XcReportError::ConfigValidationError` if a value is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(XcReportError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| XcReportError::config_parse(path, e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `outputDir`, when set, must not be blank
    /// - every output file name must be non-empty and contain no path
    ///   separator
    ///
    /// # Errors
    ///
    /// Returns `XcReportError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self
            .output_dir
            .as_deref()
            .is_some_and(|dir| dir.trim().is_empty())
        {
            return Err(XcReportError::config_validation(
                "outputDir must not be empty",
                "Remove outputDir from your xcreport.json or set it to a directory path",
            ));
        }

        for (key, value) in [
            ("reportFileName", &self.report_file_name),
            ("junitFileName", &self.junit_file_name),
            ("jsonFileName", &self.json_file_name),
        ] {
            validate_file_name(key, value)?;
        }

        Ok(())
    }
}

fn validate_file_name(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(XcReportError::config_validation(
            format!("{key} must not be empty"),
            format!("Set {key} to a plain file name in your xcreport.json"),
        ));
    }

    if value.contains(['/', '\\']) {
        return Err(XcReportError::config_validation(
            format!("{key} '{value}' must not contain a path separator"),
            format!("Use outputDir to choose the directory and keep {key} a plain file name"),
        ));
    }

    Ok(())
}
