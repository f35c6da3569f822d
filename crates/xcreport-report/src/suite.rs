//! Root tests of one testable target.

use crate::aggregate::{self, Filter, TestCounts};
use crate::status::Status;
use crate::template::{escape_html, render_all, Html, Placeholders, RenderContext};
use crate::templates;
use crate::test::{TestId, TestNode, TestTree};

/// Named collection of root tests for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    /// Stable DOM id.
    pub uuid: String,
    /// Name of the tested target.
    pub target_name: String,
    /// Every test of the suite.
    pub tests: TestTree,
}

impl TestSuite {
    /// Creates a suite over a complete tree.
    pub fn new(uuid: impl Into<String>, target_name: impl Into<String>, tests: TestTree) -> Self {
        Self {
            uuid: uuid.into(),
            target_name: target_name.into(),
            tests,
        }
    }

    /// Leaves passing `filter`, in order.
    pub fn leaves(&self, filter: Filter<'_>) -> Vec<TestId> {
        aggregate::flatten(&self.tests, self.tests.roots(), filter)
    }

    /// Counts over the filtered leaves.
    pub fn counts(&self, filter: Filter<'_>) -> TestCounts {
        TestCounts::of_leaves(&self.tests, &self.leaves(filter))
    }

    /// Rolled-up status of the filtered leaves. Success when none pass.
    pub fn status(&self, filter: Filter<'_>) -> Status {
        aggregate::rollup_status(
            self.leaves(filter)
                .into_iter()
                .map(|id| self.tests.get(id).status),
        )
    }

    /// Returns true if any leaf is named `name`.
    pub fn contains_leaf_named(&self, name: &str) -> bool {
        !self.leaves(Filter::name(name)).is_empty()
    }

    /// Root ids admitted by `filter`.
    pub fn filtered_roots(&self, filter: Filter<'_>) -> Vec<TestId> {
        self.tests
            .roots()
            .iter()
            .copied()
            .filter(|&root| aggregate::admits(&self.tests, root, filter))
            .collect()
    }
}

impl Html for TestSuite {
    fn html_template(&self) -> &'static str {
        templates::TEST_SUMMARY
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let mut values = Placeholders::new();
        values.insert("UUID", escape_html(&self.uuid));
        values.insert("TARGET_NAME", escape_html(&self.target_name));
        values.insert("STATUS_CLASS", self.status(ctx.filter).css_class().to_string());
        values.insert(
            "TESTS",
            render_all(
                self.filtered_roots(ctx.filter)
                    .into_iter()
                    .map(|root| TestNode::new(&self.tests, root)),
                ctx,
            ),
        );
        values
    }
}
