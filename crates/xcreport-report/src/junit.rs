//! JUnit XML output.
//!
//! Every suite of every run becomes one `<testsuite>`, named after its target
//! and the device it ran on. Leaf tests become `<testcase>`s.

use std::path::Path;
use std::time::Duration;

use quick_junit::{NonSuccessKind, Property, TestCase, TestCaseStatus, TestSuite};

use crate::aggregate::Filter;
use crate::run::Run;
use crate::status::Status;
use crate::suite::TestSuite as ResultSuite;
use crate::test::Test;
use crate::{Report, ReportError, Result};

/// Name of the `<testsuites>` element.
const REPORT_NAME: &str = "xcreport";

/// JUnit XML generator.
pub struct JunitGenerator<'a> {
    report: &'a Report,
}

impl<'a> JunitGenerator<'a> {
    /// Creates a new JUnit generator for the given report.
    #[must_use]
    pub const fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Builds the JUnit document model.
    pub fn build(&self) -> quick_junit::Report {
        let mut report = quick_junit::Report::new(REPORT_NAME);
        let mut total = Duration::ZERO;

        for run in &self.report.runs {
            for suite in &run.suites {
                let test_suite = build_suite(run, suite);
                total += test_suite.time.unwrap_or_default();
                report.add_test_suite(test_suite);
            }
        }

        report.set_time(total);
        report
    }

    /// Generates the XML document.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Junit`] if XML serialization fails.
    pub fn generate(&self) -> Result<String> {
        self.build()
            .to_string()
            .map_err(|e| ReportError::Junit(e.to_string()))
    }

    /// Writes the XML document to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Junit`] if XML serialization fails.
    /// Returns [`ReportError::Io`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.generate()?)?;
        Ok(())
    }
}

fn build_suite(run: &Run, suite: &ResultSuite) -> TestSuite {
    let device = &run.destination.target_device;
    let name = if device.name.is_empty() {
        suite.target_name.clone()
    } else {
        format!("{} ({})", suite.target_name, device.name)
    };

    let mut test_suite = TestSuite::new(name);
    if !device.identifier.is_empty() {
        test_suite.add_property(Property::new("device", device.identifier.as_str()));
    }
    if !device.os_version.is_empty() {
        test_suite.add_property(Property::new("os", device.os_version.as_str()));
    }

    let mut time = Duration::ZERO;
    for id in suite.leaves(Filter::none()) {
        let test = suite.tests.get(id);
        let duration = seconds(test.duration);
        time += duration;

        let mut test_case = TestCase::new(test.name.as_str(), case_status(test));
        test_case
            .set_classname(classname(test, &suite.target_name))
            .set_time(duration);
        test_suite.add_test_case(test_case);
    }

    test_suite.set_time(time);
    test_suite
}

fn case_status(test: &Test) -> TestCaseStatus {
    match test.status {
        Status::Success => TestCaseStatus::success(),
        Status::Failure => {
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            status.set_message(format!("{} failed", test.identifier));
            status
        }
        Status::Unknown => TestCaseStatus::skipped(),
    }
}

/// Class part of an identifier such as `LoginTests/testValid()`.
fn classname(test: &Test, fallback: &str) -> String {
    test.identifier
        .split_once('/')
        .map_or(fallback, |(class, _)| class)
        .to_string()
}

fn seconds(duration: f64) -> Duration {
    if duration.is_finite() && duration > 0.0 {
        Duration::from_secs_f64(duration)
    } else {
        Duration::ZERO
    }
}
