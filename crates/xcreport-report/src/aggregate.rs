//! Status and count rollups over a test tree, with an optional name filter.
//!
//! The filter is an explicit value passed to every query. A filtered query
//! never changes the tree, so clearing the filter restores every count.

use crate::status::Status;
use crate::test::{TestId, TestTree};

/// Optional exact-match test name restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter<'a>(Option<&'a str>);

impl<'a> Filter<'a> {
    /// No restriction.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Restrict to tests named exactly `name`.
    #[must_use]
    pub const fn name(name: &'a str) -> Self {
        Self(Some(name))
    }

    /// The selected name, if any.
    pub const fn as_name(&self) -> Option<&'a str> {
        self.0
    }

    /// Returns true if a name is selected.
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true if a leaf named `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        self.0.map_or(true, |selected| selected == name)
    }
}

/// Returns true if `filter` admits the node.
///
/// Without a filter every node is admitted. With one, a leaf is admitted when
/// its name matches, and a grouping node when any of its children is.
pub fn admits(tree: &TestTree, id: TestId, filter: Filter<'_>) -> bool {
    if !filter.is_set() {
        return true;
    }

    let test = tree.get(id);
    if test.is_leaf() {
        filter.matches(&test.name)
    } else {
        test.sub_tests()
            .iter()
            .any(|&child| admits(tree, child, filter))
    }
}

/// Children of `id` admitted by `filter`, in order.
pub fn filtered_sub_tests(tree: &TestTree, id: TestId, filter: Filter<'_>) -> Vec<TestId> {
    tree.get(id)
        .sub_tests()
        .iter()
        .copied()
        .filter(|&child| admits(tree, child, filter))
        .collect()
}

/// Number of tests shown under `id`.
///
/// Leaves count as one each, grouping children contribute their own amount.
/// A zero sum falls back to the number of admitted children, and with none
/// admitted, to the number of direct children. A leaf yields 0.
pub fn amount_sub_tests(tree: &TestTree, id: TestId, filter: Filter<'_>) -> usize {
    let test = tree.get(id);
    if test.is_leaf() {
        return 0;
    }

    let kids = filtered_sub_tests(tree, id, filter);
    let sum: usize = kids
        .iter()
        .map(|&kid| {
            if tree.get(kid).is_leaf() {
                1
            } else {
                amount_sub_tests(tree, kid, filter)
            }
        })
        .sum();

    if sum > 0 {
        sum
    } else if !kids.is_empty() {
        kids.len()
    } else {
        test.sub_tests().len()
    }
}

/// Ordered leaves under `roots` that pass `filter`.
pub fn flatten(tree: &TestTree, roots: &[TestId], filter: Filter<'_>) -> Vec<TestId> {
    let mut leaves = Vec::new();
    for &root in roots {
        collect_leaves(tree, root, filter, &mut leaves);
    }
    leaves
}

fn collect_leaves(tree: &TestTree, id: TestId, filter: Filter<'_>, leaves: &mut Vec<TestId>) {
    let test = tree.get(id);
    if test.is_leaf() {
        if filter.matches(&test.name) {
            leaves.push(id);
        }
        return;
    }
    for &child in test.sub_tests() {
        collect_leaves(tree, child, filter, leaves);
    }
}

/// Folds statuses into one.
///
/// Failure is sticky, success wins over unknown, and unknown inputs leave
/// the accumulator unchanged. An empty input, or one with only unknown
/// statuses, is a success.
pub fn rollup_status(statuses: impl IntoIterator<Item = Status>) -> Status {
    let folded = statuses
        .into_iter()
        .fold(Status::Unknown, |acc, status| match (acc, status) {
            (Status::Failure, _) | (_, Status::Failure) => Status::Failure,
            (_, Status::Success) => Status::Success,
            (acc, Status::Unknown) => acc,
        });

    match folded {
        Status::Unknown => Status::Success,
        other => other,
    }
}

/// Status of a node: its own for a leaf, rolled up over its leaves otherwise.
pub fn node_status(tree: &TestTree, id: TestId, filter: Filter<'_>) -> Status {
    let test = tree.get(id);
    if test.is_leaf() {
        return test.status;
    }
    rollup_status(
        flatten(tree, &[id], filter)
            .into_iter()
            .map(|leaf| tree.get(leaf).status),
    )
}

/// Test totals over a set of leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestCounts {
    /// Number of leaves.
    pub total: usize,
    /// Leaves that succeeded.
    pub passed: usize,
    /// Leaves that failed.
    pub failed: usize,
}

impl TestCounts {
    /// Counts the given statuses.
    pub fn from_statuses(statuses: impl IntoIterator<Item = Status>) -> Self {
        statuses.into_iter().fold(Self::default(), |mut counts, status| {
            counts.total += 1;
            match status {
                Status::Success => counts.passed += 1,
                Status::Failure => counts.failed += 1,
                Status::Unknown => {}
            }
            counts
        })
    }

    /// Counts the leaves of `tree` with the given ids.
    pub fn of_leaves(tree: &TestTree, leaves: &[TestId]) -> Self {
        Self::from_statuses(leaves.iter().map(|&id| tree.get(id).status))
    }

    /// Adds another set of counts to this one.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
        }
    }

    /// Failure if any counted leaf failed, success otherwise.
    pub const fn status(&self) -> Status {
        if self.failed > 0 {
            Status::Failure
        } else {
            Status::Success
        }
    }
}
