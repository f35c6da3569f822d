//! Full report rendering and per-test isolated reports.

use std::path::{Path, PathBuf};

use crate::aggregate::Filter;
use crate::attachment::RenderSource;
use crate::options::AttachmentRelocation;
use crate::report::Report;
use crate::run::Run;
use crate::template::{self, Html, RenderContext};
use crate::test::{Test, TestId};
use crate::Result;

/// Default document file name.
pub const DEFAULT_REPORT_FILE_NAME: &str = "index.html";

/// Directory attachments are exported to, relative to a document.
pub const ATTACHMENTS_DIR: &str = "Attachments";

/// Options for writing documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// File name of every written document.
    pub report_file_name: String,
    /// How per-test reports take their attachment files.
    pub relocation: AttachmentRelocation,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            relocation: AttachmentRelocation::default(),
        }
    }
}

/// Writes the full document and, optionally, one isolated document per test.
#[derive(Debug)]
pub struct ReportAssembler<'a> {
    report: &'a Report,
    output_dir: PathBuf,
    options: AssemblerOptions,
}

impl<'a> ReportAssembler<'a> {
    /// Creates an assembler writing into `output_dir`.
    pub fn new(report: &'a Report, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            report,
            output_dir: output_dir.into(),
            options: AssemblerOptions::default(),
        }
    }

    /// Sets the writing options.
    #[must_use]
    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.options = options;
        self
    }

    /// Renders the full, unfiltered document.
    pub fn render_full(&self) -> String {
        template::finish(&self.report.html(&RenderContext::full()))
    }

    /// Writes the full document to `<output>/<report file name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// document cannot be written.
    pub fn write_full(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&self.options.report_file_name);
        std::fs::write(&path, self.render_full())?;
        tracing::info!(path = %path.display(), "Wrote report");
        Ok(path)
    }

    /// Writes one isolated document per leaf of every run.
    ///
    /// Each document lives in `<output>/<sanitized test name>/` together with
    /// the test's attachment files. Attachment files that cannot be relocated
    /// are logged and left out of that document.
    ///
    /// # Errors
    ///
    /// Returns an error if a test directory cannot be created or a document
    /// cannot be written.
    pub fn write_per_test_reports(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for run in &self.report.runs {
            for (suite_index, leaf) in run.all_tests(Filter::none()) {
                written.push(self.write_isolated(run, suite_index, leaf)?);
            }
        }

        tracing::info!(count = written.len(), "Wrote per-test reports");
        Ok(written)
    }

    fn write_isolated(&self, run: &Run, suite_index: usize, leaf: TestId) -> Result<PathBuf> {
        let test = run.suites[suite_index].tests.get(leaf);
        let name = test.name.clone();
        let test_dir = self.output_dir.join(self.test_dir_name(test));
        std::fs::create_dir_all(test_dir.join(ATTACHMENTS_DIR))?;

        let mut working = run.clone();
        working.rebase_files(Path::new(".."));
        self.relocate_attachments(&mut working, suite_index, leaf, &test_dir);
        let working = working.restricted_to(&name);

        let isolated = Report::new(vec![working]);
        let html = template::finish(&isolated.html(&RenderContext::isolated(&name)));

        let path = test_dir.join(&self.options.report_file_name);
        std::fs::write(&path, html)?;
        tracing::debug!(test = %name, path = %path.display(), "Wrote per-test report");
        Ok(path)
    }

    /// Directory name for a test's isolated report.
    ///
    /// Falls back to the identifier, then the DOM id, when the sanitized name
    /// would resolve to the output directory, its parent, or the full report.
    fn test_dir_name(&self, test: &Test) -> String {
        [test.name.as_str(), test.identifier.as_str(), test.uuid.as_str()]
            .into_iter()
            .map(sanitize_test_name)
            .find(|candidate| {
                !matches!(candidate.as_str(), "" | "." | "..")
                    && *candidate != self.options.report_file_name
            })
            .unwrap_or_else(|| "unnamed-test".to_string())
    }

    /// Moves or copies the leaf's attachment files into `test_dir` and
    /// points the working copy at them.
    fn relocate_attachments(&self, run: &mut Run, suite_index: usize, leaf: TestId, test_dir: &Path) {
        let output_dir = &self.output_dir;
        let relocation = self.options.relocation;
        let test = run.suites[suite_index].tests.get_mut(leaf);

        test.visit_attachments_mut(&mut |attachment| {
            let Some(RenderSource::File(rebased)) = &attachment.source else {
                return;
            };

            let Ok(original) = rebased.strip_prefix("..") else {
                return;
            };
            let from = output_dir.join(original);
            let Some(file_name) = attachment.file_name() else {
                tracing::warn!(filename = %attachment.filename, "Attachment has no usable file name, leaving it out");
                attachment.source = None;
                return;
            };
            let relative = Path::new(ATTACHMENTS_DIR).join(file_name);
            let to = test_dir.join(&relative);

            if !from.exists() {
                tracing::warn!(path = %from.display(), "Attachment file missing, leaving it out");
                attachment.source = None;
                return;
            }

            let outcome = match relocation {
                AttachmentRelocation::Move => std::fs::rename(&from, &to),
                AttachmentRelocation::Copy => std::fs::copy(&from, &to).map(|_| ()),
            };

            match outcome {
                Ok(()) => attachment.source = Some(RenderSource::File(relative)),
                Err(e) => {
                    tracing::warn!(
                        from = %from.display(),
                        to = %to.display(),
                        error = %e,
                        "Failed to relocate attachment"
                    );
                    attachment.source = None;
                }
            }
        });
    }
}

/// Directory name for a test's isolated report.
///
/// Parentheses are removed and path separators replaced by `_`.
pub fn sanitize_test_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::activity::{Activity, ActivityType};
    use crate::attachment::{Attachment, AttachmentType};
    use crate::run::RunDestination;
    use crate::status::Status;
    use crate::suite::TestSuite;
    use crate::test::{Test, TestTree};

    fn linked_activity(files: &[&str]) -> Activity {
        let mut activity = Activity::new("a", "Capture", ActivityType::UserCreated);
        for file in files {
            let attachment_type = if file.ends_with(".png") {
                AttachmentType::Png
            } else {
                AttachmentType::Text
            };
            activity.attachments.push(
                Attachment::new(*file, attachment_type)
                    .with_source(RenderSource::File(Path::new(ATTACHMENTS_DIR).join(file))),
            );
        }
        activity
    }

    fn report() -> Report {
        let mut tree = TestTree::new();
        let a = tree.push(
            Test::leaf("t1", "Login/testValid()", "testValid()", 1.0, Status::Success)
                .with_activities(vec![linked_activity(&["valid.png", "valid.txt"])]),
        );
        let b = tree.push(
            Test::leaf("t2", "Login/testInvalid()", "testInvalid()", 1.0, Status::Failure)
                .with_activities(vec![linked_activity(&["invalid.png"])]),
        );
        let group = tree.push_group(Test::group("g1", "Login", "Login", 2.0), vec![a, b]);
        tree.add_root(group);
        tree.link_parents();

        let mut run = Run::new(
            RunDestination::default(),
            vec![TestSuite::new("s1", "AppUITests", tree)],
        );
        run.log = Some(RenderSource::File(PathBuf::from("Logs/action.txt")));
        Report::new(vec![run])
    }

    fn seed_attachments(dir: &Path) {
        let attachments = dir.join(ATTACHMENTS_DIR);
        std::fs::create_dir_all(&attachments).unwrap();
        for file in ["valid.png", "valid.txt", "invalid.png"] {
            std::fs::write(attachments.join(file), file).unwrap();
        }
    }

    #[test]
    fn test_sanitize_test_name() {
        assert_eq!(sanitize_test_name("testLogin()"), "testLogin");
        assert_eq!(sanitize_test_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_test_name("plain"), "plain");
    }

    #[test]
    fn test_render_full_strips_empty_containers() {
        let report = report();
        let html = ReportAssembler::new(&report, "out").render_full();

        assert!(html.contains("testValid()"));
        assert!(html.contains("testInvalid()"));
        assert!(!html.contains("[["));
        assert!(!html.contains("display: none\"></span>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let report = report();
        let assembler = ReportAssembler::new(&report, "out");
        assert_eq!(assembler.render_full(), assembler.render_full());
    }

    #[test]
    fn test_per_test_reports_move_attachments() {
        let dir = tempfile::tempdir().unwrap();
        seed_attachments(dir.path());
        let report = report();

        let written = ReportAssembler::new(&report, dir.path())
            .write_per_test_reports()
            .unwrap();
        assert_eq!(written.len(), 2);

        let valid_dir = dir.path().join("testValid");
        let mut files: Vec<_> = std::fs::read_dir(valid_dir.join(ATTACHMENTS_DIR))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, vec!["valid.png", "valid.txt"]);
        assert!(!dir.path().join("Attachments/valid.png").exists());

        let html = std::fs::read_to_string(valid_dir.join("index.html")).unwrap();
        assert!(html.contains("class=\"tests-header\" hidden"));
        assert!(html.contains("src=\"Attachments/valid.png\""));
        assert!(html.contains("../Logs/action.txt"));
        assert!(!html.contains("testInvalid()"));
    }

    #[test]
    fn test_copy_relocation_keeps_shared_store() {
        let dir = tempfile::tempdir().unwrap();
        seed_attachments(dir.path());
        let report = report();
        let options = AssemblerOptions {
            relocation: AttachmentRelocation::Copy,
            ..AssemblerOptions::default()
        };

        ReportAssembler::new(&report, dir.path())
            .with_options(options)
            .write_per_test_reports()
            .unwrap();

        assert!(dir.path().join("Attachments/valid.png").exists());
        assert!(dir.path().join("testValid/Attachments/valid.png").exists());
    }

    #[test]
    fn test_missing_source_is_left_out() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();

        ReportAssembler::new(&report, dir.path())
            .write_per_test_reports()
            .unwrap();

        let html = std::fs::read_to_string(dir.path().join("testValid/index.html")).unwrap();
        assert!(!html.contains("valid.png\""));
        assert!(html.contains("testValid()"));
    }

    #[test]
    fn test_original_run_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        seed_attachments(dir.path());
        let report = report();
        let before = report.clone();

        ReportAssembler::new(&report, dir.path())
            .write_per_test_reports()
            .unwrap();

        assert_eq!(report, before);
    }

    #[test]
    fn test_unusable_names_keep_full_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = TestTree::new();
        let kept = tree.push(Test::leaf("t1", "Login/testKept()", "testKept()", 1.0, Status::Success));
        let unnamed = tree.push(Test::leaf("t2", "Login/unnamed", "", 1.0, Status::Success));
        let dotted = tree.push(Test::leaf("t3", "", "..", 1.0, Status::Success));
        let group = tree.push_group(Test::group("g1", "Login", "Login", 3.0), vec![kept, unnamed, dotted]);
        tree.add_root(group);
        tree.link_parents();
        let report = Report::new(vec![Run::new(
            RunDestination::default(),
            vec![TestSuite::new("s1", "AppTests", tree)],
        )]);

        let assembler = ReportAssembler::new(&report, dir.path());
        let full = assembler.write_full().unwrap();
        let written = assembler.write_per_test_reports().unwrap();

        assert!(std::fs::read_to_string(&full).unwrap().contains("testKept()"));
        assert!(written.iter().all(|path| path != &full));
        assert!(dir.path().join("Login_unnamed/index.html").exists());
        assert!(dir.path().join("t3/index.html").exists());
    }

    #[test]
    fn test_relocation_ignores_directories_in_filename() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        seed_attachments(dir.path());
        std::fs::write(dir.path().join(ATTACHMENTS_DIR).join("stolen.png"), "png").unwrap();

        let hostile = outside.path().join("stolen.png");
        let mut activity = Activity::new("a", "Capture", ActivityType::UserCreated);
        activity.attachments.push(
            Attachment::new(hostile.to_string_lossy(), AttachmentType::Png)
                .with_source(RenderSource::File(Path::new(ATTACHMENTS_DIR).join("stolen.png"))),
        );

        let mut tree = TestTree::new();
        let leaf = tree.push(
            Test::leaf("t1", "Login/testSteal()", "testSteal()", 1.0, Status::Success)
                .with_activities(vec![activity]),
        );
        tree.add_root(leaf);
        tree.link_parents();
        let report = Report::new(vec![Run::new(
            RunDestination::default(),
            vec![TestSuite::new("s1", "AppTests", tree)],
        )]);

        ReportAssembler::new(&report, dir.path())
            .write_per_test_reports()
            .unwrap();

        assert!(!hostile.exists());
        let test_dir = dir.path().join("testSteal");
        assert!(test_dir.join("Attachments/stolen.png").exists());
        let html = std::fs::read_to_string(test_dir.join("index.html")).unwrap();
        assert!(html.contains("src=\"Attachments/stolen.png\""));
    }
}
