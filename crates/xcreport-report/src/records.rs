//! Raw records read from a result bundle.
//!
//! These mirror the bundle's object graph closely and are only used as
//! input to [`crate::build::TreeBuilder`]. Every field is optional or has a
//! default so that partially populated bundles still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to another object in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Object id.
    pub id: String,
}

impl Reference {
    /// Creates a reference to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Root record of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsInvocationRecord {
    /// One record per executed action.
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

/// One executed action, e.g. a test run on one destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// Action title.
    #[serde(default)]
    pub title: Option<String>,

    /// Where the action ran.
    #[serde(default)]
    pub run_destination: ActionRunDestinationRecord,

    /// Outcome and references to detailed results.
    #[serde(default)]
    pub action_result: ActionResult,
}

/// Destination of an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRunDestinationRecord {
    /// Display name.
    #[serde(default)]
    pub display_name: String,

    /// The device the action ran on.
    #[serde(default)]
    pub target_device_record: ActionDeviceRecord,
}

/// A device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDeviceRecord {
    /// Unique identifier.
    #[serde(default)]
    pub identifier: String,

    /// Device name.
    #[serde(default)]
    pub name: String,

    /// Operating system version.
    #[serde(default)]
    pub operating_system_version: String,

    /// Hardware model.
    #[serde(default)]
    pub model_name: String,

    /// Platform name.
    #[serde(default)]
    pub platform: String,
}

/// References to an action's results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Recorded status string.
    #[serde(default)]
    pub status: Option<String>,

    /// Test plan run summaries.
    #[serde(default)]
    pub tests_ref: Option<Reference>,

    /// Execution log payload.
    #[serde(default)]
    pub log_ref: Option<Reference>,
}

/// Results of one test plan, possibly run several times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestPlanRunSummaries {
    /// One summary per test plan run.
    #[serde(default)]
    pub summaries: Vec<ActionTestPlanRunSummary>,
}

/// Results of one test plan run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestPlanRunSummary {
    /// Run name.
    #[serde(default)]
    pub name: Option<String>,

    /// One summary per testable target.
    #[serde(default)]
    pub testable_summaries: Vec<ActionTestableSummary>,
}

/// Results of one testable target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestableSummary {
    /// Testable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Target name.
    #[serde(default)]
    pub target_name: Option<String>,

    /// Root test groups.
    #[serde(default)]
    pub tests: Vec<ActionTestSummaryGroup>,
}

impl ActionTestableSummary {
    /// Target name, falling back to the testable name.
    pub fn display_name(&self) -> &str {
        self.target_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// A group of tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestSummaryGroup {
    /// Group identifier.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Group name.
    #[serde(default)]
    pub name: Option<String>,

    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,

    /// Recorded object class.
    #[serde(default)]
    pub object_class: Option<String>,

    /// Leaf test entries.
    #[serde(default)]
    pub subtests: Vec<ActionTestMetadata>,

    /// Nested groups, used when there are no leaf entries.
    #[serde(default)]
    pub subtest_groups: Vec<ActionTestSummaryGroup>,
}

/// A leaf test entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestMetadata {
    /// Test identifier.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Test name.
    #[serde(default)]
    pub name: Option<String>,

    /// Recorded result string.
    #[serde(default)]
    pub test_status: String,

    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,

    /// Recorded object class.
    #[serde(default)]
    pub object_class: Option<String>,

    /// Detailed summary with activities.
    #[serde(default)]
    pub summary_ref: Option<Reference>,
}

/// Detailed summary of one test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestSummary {
    /// Top-level activities.
    #[serde(default)]
    pub activity_summaries: Vec<ActionTestActivitySummary>,
}

/// One recorded activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestActivitySummary {
    /// Activity title.
    #[serde(default)]
    pub title: String,

    /// Activity type string.
    #[serde(default)]
    pub activity_type: String,

    /// Activity uuid.
    #[serde(default)]
    pub uuid: Option<String>,

    /// Start timestamp.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    /// Finish timestamp.
    #[serde(default)]
    pub finish: Option<DateTime<Utc>>,

    /// Captured attachments.
    #[serde(default)]
    pub attachments: Vec<ActionTestAttachment>,

    /// Nested activities.
    #[serde(default)]
    pub subactivities: Vec<ActionTestActivitySummary>,
}

/// One captured attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTestAttachment {
    /// Uniform type identifier, e.g. `public.png`.
    #[serde(default)]
    pub uniform_type_identifier: String,

    /// Recorded name.
    #[serde(default)]
    pub name: Option<String>,

    /// Exported file name.
    #[serde(default)]
    pub filename: Option<String>,

    /// Payload reference.
    #[serde(default)]
    pub payload_ref: Option<Reference>,
}
