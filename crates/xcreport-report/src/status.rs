//! Closed status and object-class categories decoded from raw strings.

use serde::{Deserialize, Serialize};

/// Outcome of a test, or of an aggregate of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No recorded result, or a result string this tool does not know.
    #[default]
    Unknown,
    /// The test passed.
    Success,
    /// The test failed.
    Failure,
}

impl Status {
    /// Decodes a recorded result string.
    ///
    /// Anything other than `Success` or `Failure` decodes to [`Status::Unknown`].
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Success" => Self::Success,
            "Failure" => Self::Failure,
            _ => Self::Unknown,
        }
    }

    /// CSS class used for this status in the document.
    ///
    /// Unknown statuses get no class and render neutral.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Failure => "failed",
            Self::Success => "succeeded",
            Self::Unknown => "",
        }
    }

    /// Returns true if this is [`Status::Failure`].
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failure)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Structural role of a test node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectClass {
    /// Unrecognized class string.
    #[default]
    Unknown,
    /// Summary of a whole testable target.
    TestableSummary,
    /// A single test case.
    TestSummary,
    /// A grouping of test cases or other groups.
    TestSummaryGroup,
}

impl ObjectClass {
    /// Decodes a recorded object-class string.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "IDESchemeActionTestableSummary" => Self::TestableSummary,
            "IDESchemeActionTestSummary" | "ActionTestMetadata" | "ActionTestSummary" => {
                Self::TestSummary
            }
            "IDESchemeActionTestSummaryGroup" | "ActionTestSummaryGroup" => Self::TestSummaryGroup,
            _ => Self::Unknown,
        }
    }

    /// CSS class used for nodes of this class.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::TestableSummary => "testable-summary",
            Self::TestSummary => "test-summary",
            Self::TestSummaryGroup => "test-summary-group",
            Self::Unknown => "",
        }
    }
}
