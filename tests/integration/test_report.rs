//! Integration tests for aggregation, filtering and rendering over an
//! in-memory report.

use std::path::PathBuf;

use xcreport_report::aggregate::{amount_sub_tests, flatten, rollup_status};
use xcreport_report::{
    Activity, ActivityType, Attachment, AttachmentType, Filter, Html, RenderContext, RenderSource,
    Report, ReportAssembler, Run, RunDestination, Status, Test, TestSuite, TestTree,
};

fn shot(filename: &str) -> Attachment {
    Attachment::new(filename, AttachmentType::Png)
        .with_source(RenderSource::File(PathBuf::from("Attachments").join(filename)))
}

fn text(filename: &str) -> Attachment {
    Attachment::new(filename, AttachmentType::Text)
        .with_source(RenderSource::File(PathBuf::from("Attachments").join(filename)))
}

fn activities() -> Vec<Activity> {
    let mut nested = Activity::new("a2", "Tap button", ActivityType::UserCreated);
    nested.attachments = vec![text("tap.txt"), shot("tap__step2__.png")];

    let mut root = Activity::new("a1", "Open screen", ActivityType::UserCreated);
    root.attachments = vec![shot("open__step1__.png"), text("open.txt")];
    root.sub_activities = vec![nested];
    vec![root]
}

/// Two suites; the first nests a group inside a group.
fn report() -> Report {
    let mut login = TestTree::new();
    let valid = login.push(
        Test::leaf("t1", "LoginTests/testValid()", "testValid()", 1.0, Status::Success)
            .with_activities(activities()),
    );
    let invalid = login.push(Test::leaf(
        "t2",
        "LoginTests/testInvalid()",
        "testInvalid()",
        2.0,
        Status::Failure,
    ));
    let class = login.push_group(Test::group("g2", "LoginTests", "LoginTests", 3.0), vec![valid, invalid]);
    let all = login.push_group(Test::group("g1", "All tests", "All tests", 3.0), vec![class]);
    login.add_root(all);
    login.link_parents();

    let mut home = TestTree::new();
    let shown = home.push(Test::leaf("t3", "HomeTests/testShown()", "testShown()", 0.5, Status::Success));
    let group = home.push_group(Test::group("g3", "HomeTests", "HomeTests", 0.5), vec![shown]);
    home.add_root(group);
    home.link_parents();

    Report::new(vec![Run::new(
        RunDestination::default(),
        vec![
            TestSuite::new("s1", "AppTests", login),
            TestSuite::new("s2", "AppUITests", home),
        ],
    )])
}

#[test]
fn test_rollup_over_flattened_leaves() {
    let report = report();
    let suite = &report.runs[0].suites[0];
    let leaves = flatten(&suite.tests, suite.tests.roots(), Filter::none());
    assert_eq!(leaves.len(), 2);

    let statuses = leaves.iter().map(|&id| suite.tests.get(id).status);
    assert_eq!(rollup_status(statuses), Status::Failure);
    assert_eq!(rollup_status(std::iter::empty()), Status::Success);
    assert_eq!(report.runs[0].suites[1].status(Filter::none()), Status::Success);
}

#[test]
fn test_amount_sub_tests_counts_matching_leaves() {
    let report = report();
    let tree = &report.runs[0].suites[0].tests;
    let all = tree.roots()[0];
    let class = tree.get(all).sub_tests()[0];
    let valid = tree.get(class).sub_tests()[0];

    assert_eq!(amount_sub_tests(tree, valid, Filter::none()), 0);
    assert_eq!(amount_sub_tests(tree, all, Filter::none()), 2);
    assert_eq!(amount_sub_tests(tree, class, Filter::name("testValid()")), 1);
    assert_eq!(amount_sub_tests(tree, class, Filter::name("nothing")), 2);
}

/// A filter that matches nothing empties every count.
#[test]
fn test_filter_without_matches() {
    let report = report();
    let run = &report.runs[0];
    let filter = Filter::name("testMissing()");

    assert_eq!(run.number_of_tests(filter), 0);
    assert_eq!(run.number_of_failed_tests(filter), 0);
    for suite in &run.suites {
        assert_eq!(suite.status(filter), Status::Success);
        assert!(suite.filtered_roots(filter).is_empty());
    }
}

#[test]
fn test_filter_then_clear_restores_counts() {
    let report = report();
    let before = report.counts(Filter::none());

    let filtered = report.counts(Filter::name("testInvalid()"));
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.failed, 1);

    assert_eq!(report.counts(Filter::none()), before);
    assert_eq!(before.total, 3);
    assert_eq!(before.passed, 2);
}

/// Files and screenshots partition the depth-first attachment order.
#[test]
fn test_attachment_flow_partition() {
    let report = report();
    let tree = &report.runs[0].suites[0].tests;
    let valid = tree
        .ids()
        .find(|&id| tree.get(id).name == "testValid()")
        .expect("leaf present");
    let test = tree.get(valid);

    let mut all = Vec::new();
    test.visit_attachments(&mut |attachment| all.push(attachment.filename.as_str()));
    assert_eq!(all, vec!["open__step1__.png", "open.txt", "tap.txt", "tap__step2__.png"]);

    let flow = test.attachment_flow().expect("flow with screenshots");
    let files: Vec<_> = flow.files().iter().map(|a| a.filename.as_str()).collect();
    let screenshots: Vec<_> = flow.screenshots().iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(files, vec!["open.txt", "tap.txt"]);
    assert_eq!(screenshots, vec!["open__step1__.png", "tap__step2__.png"]);
    assert_eq!(files.len() + screenshots.len(), all.len());
}

#[test]
fn test_rendering_is_deterministic() {
    let report = report();
    let assembler = ReportAssembler::new(&report, "out");
    let first = assembler.render_full();

    assert_eq!(first, assembler.render_full());
    assert!(first.starts_with("<!DOCTYPE html>"));
    assert!(first.contains("All tests - 2 tests"));
    assert!(first.contains("STEP 2"));
    assert!(!first.contains("[["));
}

#[test]
fn test_isolated_render_shows_only_matching_test() {
    let report = report();
    let run = report.runs[0].restricted_to("testShown()");
    assert_eq!(run.suites.len(), 1);

    let html = run.html(&RenderContext::isolated("testShown()"));
    assert!(html.contains("testShown()"));
    assert!(!html.contains("testValid()"));
    assert!(html.contains("class=\"tests-header\" hidden"));
}
