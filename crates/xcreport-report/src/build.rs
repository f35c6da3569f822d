//! Builds the report model from raw bundle records.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::activity::{Activity, ActivityType, PADDING_STEP};
use crate::attachment::{Attachment, AttachmentName, AttachmentType, RenderSource};
use crate::extract::{PayloadKind, ResultExtractor};
use crate::options::RenderingMode;
use crate::records::{
    ActionRecord, ActionRunDestinationRecord, ActionTestActivitySummary, ActionTestAttachment,
    ActionTestMetadata, ActionTestSummaryGroup, ActionTestableSummary,
};
use crate::run::{Run, RunDestination, TargetDevice};
use crate::status::{ObjectClass, Status};
use crate::suite::TestSuite;
use crate::test::{Test, TestId, TestTree};

/// Builds [`Run`]s from one extractor.
///
/// DOM ids are assigned from a counter, so building the same bundle twice
/// yields identical models.
pub struct TreeBuilder<'a, E: ResultExtractor + ?Sized> {
    extractor: &'a E,
    mode: RenderingMode,
    document_root: PathBuf,
    next_id: usize,
}

impl<'a, E: ResultExtractor + ?Sized> TreeBuilder<'a, E> {
    /// Creates a builder writing linked payloads relative to `document_root`.
    pub fn new(extractor: &'a E, document_root: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            mode: RenderingMode::default(),
            document_root: document_root.into(),
            next_id: 0,
        }
    }

    /// Sets the rendering mode used when exporting payloads.
    #[must_use]
    pub const fn with_mode(mut self, mode: RenderingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Continues DOM id numbering after `offset`.
    ///
    /// Used when several bundles are merged into one document.
    #[must_use]
    pub const fn with_id_offset(mut self, offset: usize) -> Self {
        self.next_id = offset;
        self
    }

    /// Next free DOM id number.
    pub const fn id_offset(&self) -> usize {
        self.next_id
    }

    /// Builds one run per action.
    ///
    /// # Errors
    ///
    /// Returns the extractor's error if the action records cannot be read.
    pub fn build_runs(&mut self) -> Result<Vec<Run>, E::Error> {
        let actions = self.extractor.actions()?;
        Ok(actions.iter().map(|action| self.build_run(action)).collect())
    }

    /// Builds the run of one action.
    ///
    /// A missing test reference yields a run without suites; a missing log
    /// reference yields a run without a log. Both are logged.
    pub fn build_run(&mut self, action: &ActionRecord) -> Run {
        let title = action.title.as_deref().unwrap_or("<untitled action>");
        let destination = destination(&action.run_destination);

        let suites = match &action.action_result.tests_ref {
            None => {
                tracing::warn!(action = %title, "Action has no tests reference, skipping its tests");
                Vec::new()
            }
            Some(reference) => match self.extractor.test_plan_run_summaries(&reference.id) {
                None => {
                    tracing::warn!(
                        action = %title,
                        id = %reference.id,
                        "Test plan summaries not found, skipping its tests"
                    );
                    Vec::new()
                }
                Some(plan) => plan
                    .summaries
                    .iter()
                    .flat_map(|summary| summary.testable_summaries.iter())
                    .map(|testable| self.build_suite(testable))
                    .collect(),
            },
        };

        let log = match &action.action_result.log_ref {
            None => {
                tracing::warn!(action = %title, "Action has no log reference");
                None
            }
            Some(reference) => {
                let log = self
                    .extractor
                    .export_payload(&reference.id, PayloadKind::Log, self.mode);
                if log.is_none() {
                    tracing::warn!(action = %title, id = %reference.id, "Log could not be exported");
                }
                log
            }
        };

        let start_date = log
            .as_ref()
            .and_then(RenderSource::path)
            .and_then(|path| file_creation_date(&self.document_root.join(path)));

        tracing::debug!(
            action = %title,
            device = %destination.target_device.name,
            suites = suites.len(),
            "Built run"
        );

        Run {
            destination,
            start_date,
            suites,
            log,
        }
    }

    fn build_suite(&mut self, testable: &ActionTestableSummary) -> TestSuite {
        let mut tree = TestTree::new();
        for group in &testable.tests {
            let root = self.build_group(&mut tree, group);
            tree.add_root(root);
        }
        tree.link_parents();

        let uuid = self.next_uuid("suite");
        TestSuite::new(uuid, testable.display_name(), tree)
    }

    fn build_group(&mut self, tree: &mut TestTree, group: &ActionTestSummaryGroup) -> TestId {
        let children: Vec<TestId> = if group.subtests.is_empty() {
            group
                .subtest_groups
                .iter()
                .map(|child| self.build_group(tree, child))
                .collect()
        } else {
            group
                .subtests
                .iter()
                .map(|metadata| self.build_leaf(tree, metadata))
                .collect()
        };

        let name = group.name.as_deref().unwrap_or_default();
        let test = Test::group(
            self.next_uuid("test"),
            group.identifier.as_deref().unwrap_or(name),
            name,
            group.duration,
        )
        .with_object_class(
            group
                .object_class
                .as_deref()
                .map_or(ObjectClass::TestSummaryGroup, ObjectClass::from_raw),
        );

        tree.push_group(test, children)
    }

    fn build_leaf(&mut self, tree: &mut TestTree, metadata: &ActionTestMetadata) -> TestId {
        let name = metadata.name.as_deref().unwrap_or_default();
        let identifier = metadata.identifier.as_deref().unwrap_or(name);

        let activities = match &metadata.summary_ref {
            None => Vec::new(),
            Some(reference) => match self.extractor.action_test_summary(&reference.id) {
                None => {
                    tracing::warn!(test = %identifier, id = %reference.id, "Test summary not found");
                    Vec::new()
                }
                Some(summary) => summary
                    .activity_summaries
                    .iter()
                    .map(|raw| self.build_activity(raw, 0))
                    .collect(),
            },
        };

        let test = Test::leaf(
            self.next_uuid("test"),
            identifier,
            name,
            metadata.duration.unwrap_or(0.0),
            Status::from_raw(&metadata.test_status),
        )
        .with_activities(activities)
        .with_object_class(
            metadata
                .object_class
                .as_deref()
                .map_or(ObjectClass::TestSummary, ObjectClass::from_raw),
        );

        tree.push(test)
    }

    fn build_activity(&mut self, raw: &ActionTestActivitySummary, padding: usize) -> Activity {
        let uuid = raw
            .uuid
            .clone()
            .unwrap_or_else(|| self.next_uuid("activity"));
        let child_padding = padding + PADDING_STEP;

        let attachments = raw
            .attachments
            .iter()
            .filter_map(|attachment| self.build_attachment(attachment, child_padding))
            .collect();
        let sub_activities = raw
            .subactivities
            .iter()
            .map(|sub| self.build_activity(sub, child_padding))
            .collect();

        Activity {
            uuid,
            title: raw.title.clone(),
            activity_type: ActivityType::from_raw(&raw.activity_type),
            start_time: raw.start,
            finish_time: raw.finish,
            sub_activities,
            attachments,
            padding,
        }
    }

    fn build_attachment(&self, raw: &ActionTestAttachment, padding: usize) -> Option<Attachment> {
        let mut attachment = Attachment::new(
            raw.filename.clone().unwrap_or_default(),
            AttachmentType::from_raw(&raw.uniform_type_identifier),
        );
        attachment.name = raw.name.as_deref().map(AttachmentName::from_raw);
        attachment.padding = padding;

        if attachment.is_debug_description() {
            tracing::debug!(filename = %attachment.filename, "Dropping debug description attachment");
            return None;
        }

        attachment.source = match &raw.payload_ref {
            None => {
                tracing::warn!(filename = %attachment.filename, "Attachment has no payload reference");
                None
            }
            Some(reference) => self
                .extractor
                .export_payload(&reference.id, PayloadKind::Attachment, self.mode)
                .map(|source| self.rename_exported(source, attachment.file_name())),
        };

        Some(attachment)
    }

    /// Renames an exported file to the last component of the attachment's
    /// filename, inside the directory it was exported to.
    ///
    /// On any failure the original export path is kept.
    fn rename_exported(&self, source: RenderSource, filename: Option<&str>) -> RenderSource {
        let RenderSource::File(exported) = source else {
            return source;
        };
        let Some(filename) = filename else {
            return RenderSource::File(exported);
        };
        if exported.file_name().is_some_and(|name| name == filename) {
            return RenderSource::File(exported);
        }

        let from = self.document_root.join(&exported);
        let renamed = exported.with_file_name(filename);
        let to = self.document_root.join(&renamed);

        if !from.exists() {
            tracing::warn!(path = %from.display(), "Exported attachment not found");
            return RenderSource::File(exported);
        }
        if to.exists() {
            tracing::warn!(path = %to.display(), "Attachment file name already taken, keeping export name");
            return RenderSource::File(exported);
        }

        match std::fs::rename(&from, &to) {
            Ok(()) => RenderSource::File(renamed),
            Err(e) => {
                tracing::warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "Failed to rename exported attachment"
                );
                RenderSource::File(exported)
            }
        }
    }

    fn next_uuid(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

fn destination(record: &ActionRunDestinationRecord) -> RunDestination {
    let device = &record.target_device_record;
    RunDestination {
        name: record.display_name.clone(),
        target_device: TargetDevice {
            identifier: device.identifier.clone(),
            name: device.name.clone(),
            os_version: device.operating_system_version.clone(),
            model_name: device.model_name.clone(),
            platform: device.platform.clone(),
        },
    }
}

/// Creation time of a file, falling back to its modification time.
fn file_creation_date(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = std::fs::metadata(path).ok()?;
    let time = metadata.created().or_else(|_| metadata.modified()).ok()?;
    Some(DateTime::<Utc>::from(time))
}
