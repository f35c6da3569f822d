//! Recorded test steps.

use chrono::{DateTime, Utc};

use crate::attachment::Attachment;
use crate::template::{escape_html, format_duration, render_all, Html, Placeholders, RenderContext};
use crate::templates;

/// Activity title prefix marking a link to an external resource.
pub const EXTERNAL_LINK_PREFIX: &str = "externalLink:";

/// Horizontal indentation added per nesting level, in pixels.
pub const PADDING_STEP: usize = 20;

/// Kind of recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityType {
    /// Unrecognized activity type.
    #[default]
    Unknown,
    /// A step performed by the framework itself.
    Internal,
    /// An attachment that was recorded and then deleted.
    DeleteAttachment,
    /// A failed assertion.
    AssertionFailure,
    /// A step named by the test author.
    UserCreated,
    /// A step that only exists to hold attachments.
    AttachmentContainer,
}

impl ActivityType {
    /// Decodes a recorded activity type string.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "com.apple.dt.xctest.activity-type.internal" => Self::Internal,
            "com.apple.dt.xctest.activity-type.deletedAttachment" => Self::DeleteAttachment,
            "com.apple.dt.xctest.activity-type.testAssertionFailure" => Self::AssertionFailure,
            "com.apple.dt.xctest.activity-type.userCreated" => Self::UserCreated,
            "com.apple.dt.xctest.activity-type.attachmentContainer" => Self::AttachmentContainer,
            _ => Self::Unknown,
        }
    }

    /// CSS class for activities of this type.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Internal => "activity-internal",
            Self::DeleteAttachment => "activity-delete-attachment",
            Self::AssertionFailure => "activity-assertion-failure",
            Self::UserCreated => "activity-user-created",
            Self::AttachmentContainer => "activity-attachment-container",
            Self::Unknown => "",
        }
    }
}

/// A recorded step within a test, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Stable DOM id.
    pub uuid: String,
    /// Step title.
    pub title: String,
    /// Step kind.
    pub activity_type: ActivityType,
    /// When the step started.
    pub start_time: Option<DateTime<Utc>>,
    /// When the step finished.
    pub finish_time: Option<DateTime<Utc>>,
    /// Nested steps in recorded order.
    pub sub_activities: Vec<Activity>,
    /// Artifacts captured by this step.
    pub attachments: Vec<Attachment>,
    /// Indentation in pixels.
    pub padding: usize,
}

impl Activity {
    /// Creates an activity with no timing, children or attachments.
    pub fn new(uuid: impl Into<String>, title: impl Into<String>, activity_type: ActivityType) -> Self {
        Self {
            uuid: uuid.into(),
            title: title.into(),
            activity_type,
            start_time: None,
            finish_time: None,
            sub_activities: Vec::new(),
            attachments: Vec::new(),
            padding: 0,
        }
    }

    /// Duration in seconds, 0 unless both timestamps are known.
    pub fn duration(&self) -> f64 {
        match (self.start_time, self.finish_time) {
            (Some(start), Some(finish)) => {
                (finish - start).num_milliseconds().max(0) as f64 / 1000.0
            }
            _ => 0.0,
        }
    }

    /// Returns true if this activity or any sub-activity has attachments.
    pub fn has_any_attachment_in_subtree(&self) -> bool {
        !self.attachments.is_empty()
            || self
                .sub_activities
                .iter()
                .any(Self::has_any_attachment_in_subtree)
    }

    /// Returns true if any sub-activity, at any depth, is an assertion failure.
    pub fn has_failing_descendant(&self) -> bool {
        self.sub_activities.iter().any(|sub| {
            sub.activity_type == ActivityType::AssertionFailure || sub.has_failing_descendant()
        })
    }

    /// Target of an `externalLink:` title, if this activity is one.
    pub fn external_link(&self) -> Option<&str> {
        self.title
            .strip_prefix(EXTERNAL_LINK_PREFIX)
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    /// Visits this activity's attachments, then each sub-activity's, depth-first.
    pub fn visit_attachments<'a>(&'a self, visit: &mut impl FnMut(&'a Attachment)) {
        for attachment in &self.attachments {
            visit(attachment);
        }
        for sub in &self.sub_activities {
            sub.visit_attachments(visit);
        }
    }

    /// Mutable counterpart of [`Activity::visit_attachments`].
    pub fn visit_attachments_mut(&mut self, visit: &mut impl FnMut(&mut Attachment)) {
        for attachment in &mut self.attachments {
            visit(attachment);
        }
        for sub in &mut self.sub_activities {
            sub.visit_attachments_mut(visit);
        }
    }

    fn css_classes(&self) -> String {
        let base = self.activity_type.css_class();
        if self.activity_type == ActivityType::UserCreated && self.has_failing_descendant() {
            format!("{base} {}", ActivityType::AssertionFailure.css_class())
        } else {
            base.to_string()
        }
    }
}

impl Html for Activity {
    fn html_template(&self) -> &'static str {
        templates::ACTIVITY
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        let mut values = Placeholders::new();
        values.insert("UUID", escape_html(&self.uuid));
        values.insert("TITLE", escape_html(&self.title));
        values.insert(
            "PAPER_CLIP_CLASS",
            if self.has_any_attachment_in_subtree() {
                "inline-block"
            } else {
                "none"
            }
            .to_string(),
        );
        values.insert("PADDING", self.padding.to_string());
        values.insert("TIME", format_duration(self.duration()));
        values.insert("ACTIVITY_TYPE_CLASS", self.css_classes());
        values.insert(
            "HAS_SUB_ACTIVITIES_CLASS",
            if self.sub_activities.is_empty() {
                "no-sub-activities"
            } else {
                "has-sub-activities"
            }
            .to_string(),
        );
        values.insert("SUB_ACTIVITY", render_all(&self.sub_activities, ctx));
        values.insert("ATTACHMENTS", render_all(&self.attachments, ctx));
        values
    }
}
