//! End-to-end tests over result bundles written to disk.
//!
//! Each test writes a small bundle into a temporary directory, builds the
//! report from it and checks the written outputs.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use xcreport_core::{JsonBundle, XcReportError, INVOCATION_FILE_NAME, OBJECTS_DIR, PAYLOADS_DIR};
use xcreport_report::json::JsonGenerator;
use xcreport_report::junit::JunitGenerator;
use xcreport_report::{
    AssemblerOptions, AttachmentRelocation, Filter, RenderingMode, Report, ReportAssembler,
    ResultExtractor, Status, TreeBuilder,
};

const USER_CREATED: &str = "com.apple.dt.xctest.activity-type.userCreated";
const ASSERTION_FAILURE: &str = "com.apple.dt.xctest.activity-type.testAssertionFailure";

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).expect("serialize")).expect("write json");
}

fn leaf(name: &str, status: &str, summary: Option<&str>) -> Value {
    let mut leaf = json!({
        "identifier": format!("{name}Class/{name}()"),
        "name": format!("{name}()"),
        "testStatus": status,
        "duration": 0.25,
    });
    if let Some(id) = summary {
        leaf["summaryRef"] = json!({ "id": id });
    }
    leaf
}

fn attachment(uti: &str, filename: &str, payload: &str) -> Value {
    json!({
        "uniformTypeIdentifier": uti,
        "filename": filename,
        "payloadRef": { "id": payload },
    })
}

/// Writes a bundle with two suites and three leaves: two pass, one fails.
///
/// `testValid` captures a stepped screenshot and a text file, `testInvalid`
/// captures a failure screenshot.
fn write_bundle(root: &Path, name: &str) -> PathBuf {
    let bundle = root.join(name);
    let objects = bundle.join(OBJECTS_DIR);
    let payloads = bundle.join(PAYLOADS_DIR);
    std::fs::create_dir_all(&objects).expect("create objects");
    std::fs::create_dir_all(&payloads).expect("create payloads");

    write_json(
        &bundle.join(INVOCATION_FILE_NAME),
        &json!({
            "actions": [{
                "title": "Test",
                "runDestination": {
                    "displayName": "iPhone 15",
                    "targetDeviceRecord": {
                        "identifier": "DEVICE-1",
                        "name": "iPhone 15",
                        "operatingSystemVersion": "17.2",
                        "modelName": "iPhone",
                        "platform": "iOS Simulator"
                    }
                },
                "actionResult": {
                    "status": "failed",
                    "testsRef": { "id": "plan" },
                    "logRef": { "id": "log" }
                }
            }]
        }),
    );

    write_json(
        &objects.join("plan.json"),
        &json!({
            "summaries": [{
                "name": "Test Scheme Action",
                "testableSummaries": [
                    {
                        "targetName": "AppTests",
                        "tests": [{
                            "identifier": "All tests",
                            "name": "All tests",
                            "duration": 0.5,
                            "subtestGroups": [{
                                "identifier": "LoginTests",
                                "name": "LoginTests",
                                "duration": 0.5,
                                "subtests": [
                                    leaf("testValid", "Success", Some("summary-valid")),
                                    leaf("testInvalid", "Failure", Some("summary-invalid")),
                                ]
                            }]
                        }]
                    },
                    {
                        "targetName": "AppUITests",
                        "tests": [{
                            "identifier": "HomeTests",
                            "name": "HomeTests",
                            "duration": 0.25,
                            "subtests": [leaf("testHome", "Success", None)]
                        }]
                    }
                ]
            }]
        }),
    );

    write_json(
        &objects.join("summary-valid.json"),
        &json!({
            "activitySummaries": [{
                "title": "Open login",
                "activityType": USER_CREATED,
                "start": "2024-03-01T10:00:00Z",
                "finish": "2024-03-01T10:00:02Z",
                "attachments": [
                    attachment("public.png", "login__step1__.png", "p-valid-png"),
                    attachment("public.plain-text", "notes.txt", "p-valid-txt"),
                ],
                "subactivities": [{
                    "title": "Debug description of app",
                    "activityType": USER_CREATED,
                    "attachments": [{
                        "uniformTypeIdentifier": "public.plain-text",
                        "name": "Debug description",
                        "filename": "debug.txt",
                        "payloadRef": { "id": "p-debug" }
                    }]
                }]
            }]
        }),
    );

    write_json(
        &objects.join("summary-invalid.json"),
        &json!({
            "activitySummaries": [{
                "title": "Assert error shown",
                "activityType": ASSERTION_FAILURE,
                "attachments": [
                    attachment("public.png", "Failure__step3__.png", "p-invalid-png"),
                ]
            }]
        }),
    );

    for (id, contents) in [
        ("log", "build log"),
        ("p-valid-png", "valid png"),
        ("p-valid-txt", "valid notes"),
        ("p-invalid-png", "invalid png"),
        ("p-debug", "debug"),
    ] {
        std::fs::write(payloads.join(id), contents).expect("write payload");
    }

    bundle
}

fn build(bundle: &Path, output: &Path, mode: RenderingMode) -> Report {
    let extractor = JsonBundle::open(bundle, output).expect("open bundle");
    let runs = TreeBuilder::new(&extractor, output)
        .with_mode(mode)
        .build_runs()
        .expect("build runs");
    Report::new(runs)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Two suites, three leaves, one failure.
#[test]
fn test_counts_and_status_from_bundle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);

    assert_eq!(report.runs.len(), 1);
    let run = &report.runs[0];
    assert_eq!(run.suites.len(), 2);
    assert_eq!(run.number_of_tests(Filter::none()), 3);
    assert_eq!(run.number_of_passed_tests(Filter::none()), 2);
    assert_eq!(run.number_of_failed_tests(Filter::none()), 1);
    assert_eq!(run.status(Filter::none()), Status::Failure);
    assert_eq!(run.suites[1].status(Filter::none()), Status::Success);
    assert_eq!(run.destination.target_device.os_version, "17.2");
    assert!(run.start_date.is_some());
}

#[test]
fn test_linked_payloads_are_exported_and_renamed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);

    assert_eq!(
        file_names(&dir.path().join("Attachments")),
        vec!["Failure__step3__.png", "login__step1__.png", "notes.txt"]
    );
    assert_eq!(file_names(&dir.path().join("Logs")), vec!["log"]);

    let html = ReportAssembler::new(&report, dir.path()).render_full();
    assert!(html.contains("src=\"Attachments/login__step1__.png\""));
    assert!(html.contains("Logs/log"));
    assert!(html.contains("STEP 1"));
    assert!(!html.contains("debug.txt"));
    assert!(!html.contains("[["));
}

/// Failure marker and step number come from the file name.
#[test]
fn test_attachment_name_markers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);
    let run = &report.runs[0];

    let mut seen = Vec::new();
    for (suite, id) in run.all_tests(Filter::none()) {
        run.suites[suite].tests.get(id).visit_attachments(&mut |attachment| {
            seen.push((
                attachment.filename.clone(),
                attachment.is_failure(),
                attachment.step().map(str::to_string),
            ));
        });
    }

    assert!(seen.contains(&("Failure__step3__.png".to_string(), true, Some("3".to_string()))));
    assert!(seen.contains(&("login__step1__.png".to_string(), false, Some("1".to_string()))));
    assert!(seen.contains(&("notes.txt".to_string(), false, None)));
}

/// A per-test report for a passing leaf holds exactly that leaf's files.
#[test]
fn test_per_test_report_for_passing_leaf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);

    let assembler = ReportAssembler::new(&report, dir.path());
    assembler.write_full().expect("write full");
    let written = assembler.write_per_test_reports().expect("write per-test");
    assert_eq!(written.len(), 3);

    let test_dir = dir.path().join("testValid");
    assert_eq!(
        file_names(&test_dir.join("Attachments")),
        vec!["login__step1__.png", "notes.txt"]
    );

    let html = std::fs::read_to_string(test_dir.join("index.html")).expect("read report");
    assert!(html.contains("class=\"tests-header\" hidden"));
    assert!(html.contains("src=\"Attachments/login__step1__.png\""));
    assert!(html.contains("../Logs/log"));
    assert!(html.contains("AppTests"));
    assert!(!html.contains("AppUITests"));
    assert!(!html.contains("testInvalid()"));

    assert!(dir.path().join("testHome/index.html").exists());
    assert!(file_names(&dir.path().join("testHome/Attachments")).is_empty());
}

#[test]
fn test_per_test_report_with_copy_relocation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);

    let options = AssemblerOptions {
        relocation: AttachmentRelocation::Copy,
        ..AssemblerOptions::default()
    };
    ReportAssembler::new(&report, dir.path())
        .with_options(options)
        .write_per_test_reports()
        .expect("write per-test");

    assert!(dir.path().join("Attachments/login__step1__.png").exists());
    assert!(dir.path().join("testValid/Attachments/login__step1__.png").exists());
    assert!(dir.path().join("testInvalid/Attachments/Failure__step3__.png").exists());
}

#[test]
fn test_inline_mode_embeds_payloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Inline);

    assert!(!dir.path().join("Attachments").exists());
    let html = ReportAssembler::new(&report, dir.path()).render_full();
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("data:text/plain;base64,"));
}

#[test]
fn test_junit_and_json_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    let report = build(&bundle, dir.path(), RenderingMode::Linking);

    let junit_path = dir.path().join("report.junit");
    JunitGenerator::new(&report)
        .write_to_file(&junit_path)
        .expect("write junit");
    let xml = std::fs::read_to_string(&junit_path).expect("read junit");
    assert!(xml.contains("AppTests (iPhone 15)"));
    assert!(xml.contains("testInvalid()"));
    assert!(xml.contains("<failure"));

    let json_path = dir.path().join("report.json");
    JsonGenerator::new(&report)
        .write_to_file(&json_path, false)
        .expect("write json");
    let summary: Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read json"))
            .expect("parse json");
    assert_eq!(summary["status"], "failure");
    assert_eq!(summary["counts"]["total"], 3);
    assert_eq!(summary["runs"][0]["suites"].as_array().map(Vec::len), Some(2));
}

/// Building the same bundle twice yields the same document.
#[test]
fn test_build_and_render_are_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");

    let mut first = build(&bundle, &dir.path().join("a"), RenderingMode::Linking);
    let mut second = build(&bundle, &dir.path().join("b"), RenderingMode::Linking);
    for report in [&mut first, &mut second] {
        for run in &mut report.runs {
            run.start_date = None;
        }
    }

    assert_eq!(first, second);
    assert_eq!(
        ReportAssembler::new(&first, "out").render_full(),
        ReportAssembler::new(&second, "out").render_full()
    );
}

/// DOM ids continue across bundles merged into one report.
#[test]
fn test_multiple_bundles_have_distinct_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = JsonBundle::open(write_bundle(dir.path(), "First.xcresult"), dir.path())
        .expect("open first");
    let second = JsonBundle::open(write_bundle(dir.path(), "Second.xcresult"), dir.path())
        .expect("open second");

    let mut builder = TreeBuilder::new(&first, dir.path());
    let mut runs = builder.build_runs().expect("first runs");
    let mut builder = TreeBuilder::new(&second, dir.path()).with_id_offset(builder.id_offset());
    runs.extend(builder.build_runs().expect("second runs"));

    let mut ids: Vec<String> = runs
        .iter()
        .flat_map(|run| run.suites.iter())
        .flat_map(|suite| {
            suite
                .tests
                .ids()
                .map(|id| suite.tests.get(id).uuid.clone())
                .chain(std::iter::once(suite.uuid.clone()))
                .collect::<Vec<_>>()
        })
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_missing_invocation_record_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = JsonBundle::open(dir.path(), dir.path()).expect("open");

    let err = bundle.actions().expect_err("no invocation record");
    assert!(matches!(err, XcReportError::BundleStructureMissing { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_missing_test_plan_yields_empty_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = write_bundle(dir.path(), "Run.xcresult");
    std::fs::remove_file(bundle.join(OBJECTS_DIR).join("plan.json")).expect("remove plan");

    let report = build(&bundle, dir.path(), RenderingMode::Linking);
    assert!(report.runs[0].suites.is_empty());
    assert_eq!(report.runs[0].status(Filter::none()), Status::Success);
    assert!(report.runs[0].log.is_some());
}
