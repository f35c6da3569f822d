//! One execution of the test plan against one destination.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::aggregate::{Filter, TestCounts};
use crate::attachment::RenderSource;
use crate::status::Status;
use crate::suite::TestSuite;
use crate::template::{escape_html, render_all, Html, Placeholders, RenderContext};
use crate::templates;
use crate::test::TestId;

/// Device a run executed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDevice {
    /// Unique device identifier.
    pub identifier: String,
    /// User-visible device name.
    pub name: String,
    /// Operating system version.
    pub os_version: String,
    /// Hardware model name.
    pub model_name: String,
    /// Platform name, e.g. `iOS Simulator`.
    pub platform: String,
}

/// Where a run executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDestination {
    /// Destination display name.
    pub name: String,
    /// The device itself.
    pub target_device: TargetDevice,
}

/// Suites executed on one destination, with the execution log.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Where the run executed.
    pub destination: RunDestination,
    /// Start of the run, when it could be determined.
    pub start_date: Option<DateTime<Utc>>,
    /// Suites in recorded order.
    pub suites: Vec<TestSuite>,
    /// Execution log. `None` when it could not be exported.
    pub log: Option<RenderSource>,
}

impl Run {
    /// Creates a run without a log or start date.
    pub fn new(destination: RunDestination, suites: Vec<TestSuite>) -> Self {
        Self {
            destination,
            start_date: None,
            suites,
            log: None,
        }
    }

    /// Every leaf passing `filter` as `(suite index, test id)`, in order.
    pub fn all_tests(&self, filter: Filter<'_>) -> Vec<(usize, TestId)> {
        self.suites
            .iter()
            .enumerate()
            .flat_map(|(index, suite)| {
                suite
                    .leaves(filter)
                    .into_iter()
                    .map(move |id| (index, id))
            })
            .collect()
    }

    /// Counts over every suite's filtered leaves.
    pub fn counts(&self, filter: Filter<'_>) -> TestCounts {
        self.suites
            .iter()
            .map(|suite| suite.counts(filter))
            .fold(TestCounts::default(), TestCounts::merge)
    }

    /// Number of filtered leaves.
    pub fn number_of_tests(&self, filter: Filter<'_>) -> usize {
        self.counts(filter).total
    }

    /// Number of filtered leaves that passed.
    pub fn number_of_passed_tests(&self, filter: Filter<'_>) -> usize {
        self.counts(filter).passed
    }

    /// Number of filtered leaves that failed.
    pub fn number_of_failed_tests(&self, filter: Filter<'_>) -> usize {
        self.counts(filter).failed
    }

    /// Failure iff any filtered leaf failed.
    pub fn status(&self, filter: Filter<'_>) -> Status {
        self.counts(filter).status()
    }

    /// Independent copy keeping only suites with a leaf named `name`.
    #[must_use]
    pub fn restricted_to(&self, name: &str) -> Self {
        let mut run = self.clone();
        run.suites.retain(|suite| suite.contains_leaf_named(name));
        run
    }

    /// Prefixes every file reference (log and attachments) with `prefix`.
    ///
    /// Used when the document moves one directory level down from the
    /// location the files were exported relative to.
    pub fn rebase_files(&mut self, prefix: &Path) {
        if let Some(RenderSource::File(path)) = &mut self.log {
            *path = prefix.join(&*path);
        }
        for suite in &mut self.suites {
            suite.tests.visit_attachments_mut(&mut |attachment| {
                if let Some(RenderSource::File(path)) = &mut attachment.source {
                    *path = prefix.join(&*path);
                }
            });
        }
    }

    /// URI of the execution log, if there is one.
    pub fn log_uri(&self) -> Option<String> {
        self.log.as_ref()?.uri(Some("text/plain"))
    }

    /// Device list entry for this run.
    pub const fn device(&self) -> DeviceEntry<'_> {
        DeviceEntry(self)
    }
}

impl Html for Run {
    fn html_template(&self) -> &'static str {
        templates::RUN
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let counts = self.counts(ctx.filter);
        let log = self.log_uri();

        let mut values = Placeholders::new();
        values.insert(
            "DEVICE_IDENTIFIER",
            escape_html(&self.destination.target_device.identifier),
        );
        values.insert(
            "HEADER_ATTRIBUTES",
            if ctx.hide_run_header { " hidden" } else { "" }.to_string(),
        );
        values.insert("LOG_SOURCE", log.as_deref().map(escape_html).unwrap_or_default());
        values.insert(
            "LOG_DISPLAY",
            if log.is_some() { "inline-block" } else { "none" }.to_string(),
        );
        values.insert("N_OF_TESTS", counts.total.to_string());
        values.insert("N_OF_PASSED_TESTS", counts.passed.to_string());
        values.insert("N_OF_FAILED_TESTS", counts.failed.to_string());
        values.insert("RESULT_CLASS", counts.status().css_class().to_string());
        values.insert("TEST_SUMMARIES", render_all(&self.suites, ctx));
        values
    }
}

/// A run's entry in the device list.
#[derive(Debug, Clone, Copy)]
pub struct DeviceEntry<'a>(&'a Run);

impl Html for DeviceEntry<'_> {
    fn html_template(&self) -> &'static str {
        templates::DEVICE
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let device = &self.0.destination.target_device;

        let mut values = Placeholders::new();
        values.insert("DEVICE_IDENTIFIER", escape_html(&device.identifier));
        values.insert("DEVICE_NAME", escape_html(&device.name));
        values.insert("DEVICE_OS", escape_html(&device.os_version));
        values.insert("DEVICE_MODEL", escape_html(&device.model_name));
        values.insert("DEVICE_PLATFORM", escape_html(&device.platform));
        values.insert(
            "RESULT_CLASS",
            self.0.status(ctx.filter).css_class().to_string(),
        );
        values
    }
}
