//! xcreport Report Generation
//!
//! This crate turns the raw records of an XCTest result bundle into a
//! browsable HTML document, a JUnit XML file and a JSON summary.
//!
//! # Model
//!
//! - [`Report`] - Every run of one or more bundles
//! - [`Run`] - Suites executed on one destination, with the execution log
//! - [`TestSuite`] - Root tests of one target, stored in a [`TestTree`] arena
//! - [`Test`] - A leaf test case or a grouping node
//! - [`Activity`] - A recorded step, possibly nested
//! - [`Attachment`] - An exported artifact
//!
//! # Pipeline
//!
//! 1. A [`ResultExtractor`] reads raw records from a bundle.
//! 2. [`TreeBuilder`] turns them into [`Run`]s.
//! 3. [`aggregate`] answers status and count queries under a [`Filter`].
//! 4. [`ReportAssembler`] renders the model through the [`Html`] trait and
//!    writes the full document and optional per-test documents.
//! 5. [`junit::JunitGenerator`] and [`json::JsonGenerator`] write the
//!    machine-readable outputs.
//!
//! # Example
//!
//! ```rust
//! use xcreport_report::{ReportAssembler, Report, Run, RunDestination, Status, Test, TestSuite, TestTree};
//!
//! let mut tree = TestTree::new();
//! let leaf = tree.push(Test::leaf("t1", "LoginTests/testValid()", "testValid()", 0.5, Status::Success));
//! let group = tree.push_group(Test::group("g1", "LoginTests", "LoginTests", 0.5), vec![leaf]);
//! tree.add_root(group);
//! tree.link_parents();
//!
//! let run = Run::new(RunDestination::default(), vec![TestSuite::new("s1", "AppTests", tree)]);
//! let report = Report::new(vec![run]);
//!
//! let html = ReportAssembler::new(&report, "out").render_full();
//! assert!(html.contains("LoginTests - 1 tests"));
//! ```

pub mod activity;
pub mod aggregate;
pub mod assemble;
pub mod attachment;
pub mod build;
pub mod extract;
pub mod flow;
pub mod json;
pub mod junit;
pub mod options;
pub mod records;
mod report;
mod run;
pub mod status;
mod suite;
pub mod template;
pub mod templates;

pub use activity::{Activity, ActivityType};
pub use aggregate::{Filter, TestCounts};
pub use assemble::{sanitize_test_name, AssemblerOptions, ReportAssembler};
pub use attachment::{Attachment, AttachmentName, AttachmentType, RenderSource};
pub use build::TreeBuilder;
pub use extract::{PayloadKind, ResultExtractor};
pub use flow::AttachmentFlow;
pub use options::{AttachmentRelocation, RenderingMode};
pub use report::Report;
pub use run::{DeviceEntry, Run, RunDestination, TargetDevice};
pub use status::{ObjectClass, Status};
pub use suite::TestSuite;
pub use template::{Html, RenderContext};
pub use test::{Test, TestId, TestNode, TestTree};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the JSON summary.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the JUnit XML document.
    #[error("failed to serialize JUnit report: {0}")]
    Junit(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
