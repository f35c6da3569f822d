//! File/screenshot partition of a test's attachments.

use crate::activity::Activity;
use crate::attachment::Attachment;
use crate::template::{render_all, Html, Placeholders, RenderContext};
use crate::templates;

/// A test's attachments split into files and screenshots, in recorded order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFlow<'a> {
    files: Vec<&'a Attachment>,
    screenshots: Vec<&'a Attachment>,
}

impl<'a> AttachmentFlow<'a> {
    /// Partitions every attachment under `activities`, depth-first.
    ///
    /// Returns `None` unless at least one screenshot exists. That gate also
    /// hides file attachments of tests that captured no screenshot.
    pub fn new(activities: &'a [Activity]) -> Option<Self> {
        let mut files = Vec::new();
        let mut screenshots = Vec::new();

        for activity in activities {
            activity.visit_attachments(&mut |attachment| {
                if attachment.is_screenshot() {
                    screenshots.push(attachment);
                } else {
                    files.push(attachment);
                }
            });
        }

        if screenshots.is_empty() {
            return None;
        }

        Some(Self { files, screenshots })
    }

    /// Non-screenshot attachments.
    pub fn files(&self) -> &[&'a Attachment] {
        &self.files
    }

    /// Screenshot attachments.
    pub fn screenshots(&self) -> &[&'a Attachment] {
        &self.screenshots
    }
}

impl Html for AttachmentFlow<'_> {
    fn html_template(&self) -> &'static str {
        templates::FLOW
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let mut values = Placeholders::new();
        values.insert("FILES", render_all(self.files.iter().copied().map(FileItem), ctx));
        values.insert(
            "SCREENSHOTS",
            render_all(self.screenshots.iter().copied().map(ScreenshotItem), ctx),
        );
        values
    }
}

/// A file attachment rendered as a clickable list item.
struct FileItem<'a>(&'a Attachment);

impl Html for FileItem<'_> {
    fn html_template(&self) -> &'static str {
        if self.0.source_uri().is_none() {
            return "";
        }
        templates::FLOW_FILE
    }

    fn html_placeholder_values(&self, _ctx: &RenderContext<'_>) -> Placeholders {
        self.0.common_placeholders()
    }
}

/// A screenshot rendered as a thumbnail, with a step badge when it has one.
struct ScreenshotItem<'a>(&'a Attachment);

impl Html for ScreenshotItem<'_> {
    fn html_template(&self) -> &'static str {
        if self.0.source_uri().is_none() {
            return "";
        }
        if self.0.step().is_some() {
            templates::FLOW_SCREENSHOT_WITH_STEP
        } else {
            templates::FLOW_SCREENSHOT
        }
    }

    fn html_placeholder_values(&self, _ctx: &RenderContext<'_>) -> Placeholders {
        let mut values = self.0.common_placeholders();
        values.insert(
            "FAILURE_CLASS",
            if self.0.is_failure() { "failure" } else { "" }.to_string(),
        );
        values
    }
}
