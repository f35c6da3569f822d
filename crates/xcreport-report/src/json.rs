//! Machine-readable JSON summary.
//!
//! [`JsonGenerator`] flattens a [`Report`] into counts and per-test outcomes.
//! Activities and attachments are left out; the HTML document carries those.
//!
//! # Example
//!
//! ```rust
//! use xcreport_report::Report;
//! use xcreport_report::json::JsonGenerator;
//!
//! let report = Report::default();
//! let generator = JsonGenerator::new(&report);
//!
//! let json = generator.generate_pretty().unwrap();
//! assert!(json.contains("\"status\": \"success\""));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::aggregate::{Filter, TestCounts};
use crate::status::Status;
use crate::{Report, ReportError, Result};

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    /// Run date, `YYYY-MM-DD`, empty if unknown.
    pub date: String,
    /// Failure iff any test failed.
    pub status: Status,
    /// Totals over every run.
    pub counts: JsonCounts,
    /// One entry per run.
    pub runs: Vec<JsonRun>,
}

/// Test totals.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCounts {
    /// Number of tests.
    pub total: usize,
    /// Passed tests.
    pub passed: usize,
    /// Failed tests.
    pub failed: usize,
}

impl From<TestCounts> for JsonCounts {
    fn from(counts: TestCounts) -> Self {
        Self {
            total: counts.total,
            passed: counts.passed,
            failed: counts.failed,
        }
    }
}

/// One run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRun {
    /// Device identifier.
    pub device_identifier: String,
    /// Device name.
    pub device_name: String,
    /// Operating system version.
    pub os_version: String,
    /// Run status.
    pub status: Status,
    /// Run totals.
    pub counts: JsonCounts,
    /// One entry per suite.
    pub suites: Vec<JsonSuite>,
}

/// One suite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSuite {
    /// Target name.
    pub target_name: String,
    /// Suite status.
    pub status: Status,
    /// Suite totals.
    pub counts: JsonCounts,
    /// Every leaf test.
    pub tests: Vec<JsonTest>,
}

/// One leaf test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTest {
    /// Test identifier.
    pub identifier: String,
    /// Test name.
    pub name: String,
    /// Test status.
    pub status: Status,
    /// Duration in seconds.
    pub duration: f64,
}

impl JsonSummary {
    /// Summarizes `report`.
    pub fn from_report(report: &Report) -> Self {
        let filter = Filter::none();
        let counts = report.counts(filter);

        let runs = report
            .runs
            .iter()
            .map(|run| {
                let device = &run.destination.target_device;
                let suites = run
                    .suites
                    .iter()
                    .map(|suite| JsonSuite {
                        target_name: suite.target_name.clone(),
                        status: suite.status(filter),
                        counts: suite.counts(filter).into(),
                        tests: suite
                            .leaves(filter)
                            .into_iter()
                            .map(|id| {
                                let test = suite.tests.get(id);
                                JsonTest {
                                    identifier: test.identifier.clone(),
                                    name: test.name.clone(),
                                    status: test.status,
                                    duration: test.duration,
                                }
                            })
                            .collect(),
                    })
                    .collect();

                JsonRun {
                    device_identifier: device.identifier.clone(),
                    device_name: device.name.clone(),
                    os_version: device.os_version.clone(),
                    status: run.status(filter),
                    counts: run.counts(filter).into(),
                    suites,
                }
            })
            .collect();

        Self {
            date: report.date_string(),
            status: counts.status(),
            counts: counts.into(),
            runs,
        }
    }
}

/// JSON summary generator.
pub struct JsonGenerator<'a> {
    report: &'a Report,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given report.
    #[must_use]
    pub const fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Generates compact JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(&JsonSummary::from_report(self.report)).map_err(ReportError::from)
    }

    /// Generates pretty-printed JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&JsonSummary::from_report(self.report))
            .map_err(ReportError::from)
    }

    /// Writes the JSON summary to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if JSON serialization fails.
    /// Returns [`ReportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
