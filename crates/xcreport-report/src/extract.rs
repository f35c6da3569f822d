//! Read access to a result bundle.

use crate::attachment::RenderSource;
use crate::options::RenderingMode;
use crate::records::{ActionRecord, ActionTestPlanRunSummaries, ActionTestSummary};

/// Kind of payload being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// An attachment captured by a test.
    Attachment,
    /// An action's execution log.
    Log,
}

/// Source of raw records for [`crate::build::TreeBuilder`].
///
/// Only [`ResultExtractor::actions`] can fail: everything else resolves
/// references, and an unresolvable reference is reported as `None` so the
/// builder can log it and carry on.
pub trait ResultExtractor {
    /// Error returned when the invocation record cannot be read.
    type Error;

    /// The invocation's action records.
    fn actions(&self) -> Result<Vec<ActionRecord>, Self::Error>;

    /// Test plan run summaries with the given id.
    fn test_plan_run_summaries(&self, id: &str) -> Option<ActionTestPlanRunSummaries>;

    /// Detailed test summary with the given id.
    fn action_test_summary(&self, id: &str) -> Option<ActionTestSummary>;

    /// Exports a payload.
    ///
    /// In [`RenderingMode::Linking`] the payload is written to disk and the
    /// returned path is relative to the directory the document is written
    /// to. In [`RenderingMode::Inline`] its bytes are returned.
    fn export_payload(&self, id: &str, kind: PayloadKind, mode: RenderingMode) -> Option<RenderSource>;
}
