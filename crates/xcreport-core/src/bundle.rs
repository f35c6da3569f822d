//! Result bundle reader.
//!
//! [`JsonBundle`] reads a bundle exported as JSON on disk:
//!
//! ```text
//! <bundle>/invocation.json    invocation record
//! <bundle>/objects/<id>.json  referenced objects
//! <bundle>/payloads/<id>      raw payload bytes
//! ```
//!
//! Linked payloads are copied below the output directory, attachments into
//! `Attachments/` and logs into `Logs/`.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use xcreport_report::assemble::ATTACHMENTS_DIR;
use xcreport_report::records::{
    ActionRecord, ActionTestPlanRunSummaries, ActionTestSummary, ActionsInvocationRecord,
};
use xcreport_report::{PayloadKind, RenderSource, RenderingMode, ResultExtractor};

use crate::error::{Result, XcReportError};

/// File holding the invocation record.
pub const INVOCATION_FILE_NAME: &str = "invocation.json";

/// Directory holding referenced objects.
pub const OBJECTS_DIR: &str = "objects";

/// Directory holding payloads.
pub const PAYLOADS_DIR: &str = "payloads";

/// Directory logs are exported to, relative to the output directory.
pub const LOGS_DIR: &str = "Logs";

/// A result bundle on disk.
#[derive(Debug, Clone)]
pub struct JsonBundle {
    path: PathBuf,
    output_dir: PathBuf,
}

impl JsonBundle {
    /// Opens the bundle at `path`, exporting linked payloads below
    /// `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns `XcReportError::BundleNotFound` if `path` is not a directory.
    pub fn open(path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(XcReportError::bundle_not_found(path));
        }

        tracing::debug!(bundle = %path.display(), "Opened result bundle");
        Ok(Self {
            path,
            output_dir: output_dir.into(),
        })
    }

    /// Path of the bundle.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory linked payloads are exported below.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reads the invocation record.
    ///
    /// # Errors
    ///
    /// Returns `XcReportError::BundleStructureMissing` if the record does not
    /// exist and `XcReportError::ObjectParseError` if it cannot be parsed.
    pub fn invocation(&self) -> Result<ActionsInvocationRecord> {
        let path = self.path.join(INVOCATION_FILE_NAME);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(XcReportError::bundle_structure_missing(&self.path));
            }
            Err(e) => return Err(XcReportError::object_parse(&path, e.to_string())),
        };

        serde_json::from_str(&contents).map_err(|e| XcReportError::object_parse(&path, e.to_string()))
    }

    fn object<T: DeserializeOwned>(&self, id: &str) -> Option<T> {
        if !is_plain_id(id) {
            tracing::warn!(id = %id, "Ignoring object reference with path components");
            return None;
        }

        let path = self.path.join(OBJECTS_DIR).join(format!("{id}.json"));
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Object not readable");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(object) => Some(object),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse object");
                None
            }
        }
    }

    fn copy_payload(&self, from: &Path, id: &str, kind: PayloadKind) -> Option<RenderSource> {
        let directory = match kind {
            PayloadKind::Attachment => ATTACHMENTS_DIR,
            PayloadKind::Log => LOGS_DIR,
        };
        let relative = Path::new(directory).join(id);
        let to = self.output_dir.join(&relative);

        let copied = std::fs::create_dir_all(self.output_dir.join(directory))
            .and_then(|()| std::fs::copy(from, &to));
        match copied {
            Ok(bytes) => {
                tracing::debug!(path = %to.display(), bytes, "Exported payload");
                Some(RenderSource::File(relative))
            }
            Err(e) => {
                tracing::warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "Failed to export payload"
                );
                None
            }
        }
    }
}

impl ResultExtractor for JsonBundle {
    type Error = XcReportError;

    fn actions(&self) -> Result<Vec<ActionRecord>> {
        Ok(self.invocation()?.actions)
    }

    fn test_plan_run_summaries(&self, id: &str) -> Option<ActionTestPlanRunSummaries> {
        self.object(id)
    }

    fn action_test_summary(&self, id: &str) -> Option<ActionTestSummary> {
        self.object(id)
    }

    fn export_payload(&self, id: &str, kind: PayloadKind, mode: RenderingMode) -> Option<RenderSource> {
        if !is_plain_id(id) {
            tracing::warn!(id = %id, "Ignoring payload reference with path components");
            return None;
        }

        let from = self.path.join(PAYLOADS_DIR).join(id);
        if !from.is_file() {
            tracing::warn!(path = %from.display(), "Payload not found");
            return None;
        }

        match mode {
            RenderingMode::Linking => self.copy_payload(&from, id, kind),
            RenderingMode::Inline => match std::fs::read(&from) {
                Ok(bytes) => Some(RenderSource::Inline(bytes)),
                Err(e) => {
                    tracing::warn!(path = %from.display(), error = %e, "Failed to read payload");
                    None
                }
            },
        }
    }
}

/// Ids name files directly below the bundle's directories.
fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}
