//! Exported test artifacts.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::template::{escape_html, Html, Placeholders, RenderContext};
use crate::templates;

/// Prefix of attachment names that carry no user value and are dropped.
pub const DEBUG_DESCRIPTION_PREFIX: &str = "Debug description";

/// Content category of an attachment, decoded from its uniform type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttachmentType {
    /// Unrecognized type identifier.
    #[default]
    Unknown,
    /// Opaque binary data.
    Data,
    /// An HTML document.
    Html,
    /// A JPEG image.
    Jpeg,
    /// A PNG image.
    Png,
    /// Plain text.
    Text,
}

impl AttachmentType {
    /// Decodes a uniform type identifier such as `public.png`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "public.data" => Self::Data,
            "public.html" => Self::Html,
            "public.jpeg" => Self::Jpeg,
            "public.png" => Self::Png,
            "public.plain-text" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// MIME type used for data URIs. `None` for unknown content.
    pub const fn mime_type(self) -> Option<&'static str> {
        match self {
            Self::Data => Some("application/octet-stream"),
            Self::Html => Some("text/html"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Png => Some("image/png"),
            Self::Text => Some("text/plain"),
            Self::Unknown => None,
        }
    }

    /// Display category used as a CSS class.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Jpeg | Self::Png => "screenshot",
            Self::Data | Self::Html | Self::Text => "text",
            Self::Unknown => "",
        }
    }

    /// Returns true for image types shown inline as screenshots.
    pub const fn is_screenshot(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    const fn fallback_name(self) -> &'static str {
        match self {
            Self::Jpeg | Self::Png => "Screenshot",
            Self::Data | Self::Html | Self::Text => "File",
            Self::Unknown => "Attachment",
        }
    }
}

/// Attachment name as recorded by the test runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentName {
    /// The automatic screenshot XCTest captures for UI tests.
    LegacyScreenImageData,
    /// Any other name, typically chosen by the test author.
    Custom(String),
}

impl AttachmentName {
    /// Raw value of [`AttachmentName::LegacyScreenImageData`].
    pub const LEGACY_SCREEN_IMAGE_DATA: &'static str = "kXCTAttachmentLegacyScreenImageData";

    /// Decodes a recorded attachment name.
    pub fn from_raw(raw: &str) -> Self {
        if raw == Self::LEGACY_SCREEN_IMAGE_DATA {
            Self::LegacyScreenImageData
        } else {
            Self::Custom(raw.to_string())
        }
    }

    /// The raw recorded string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::LegacyScreenImageData => Self::LEGACY_SCREEN_IMAGE_DATA,
            Self::Custom(name) => name,
        }
    }
}

/// Where an attachment's bytes come from at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSource {
    /// Bytes embedded into the document.
    Inline(Vec<u8>),
    /// An exported file, relative to the directory the document is written to.
    File(PathBuf),
}

impl RenderSource {
    /// The file path, if this is a file reference.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Inline(_) => None,
        }
    }

    /// URI usable in `src`/`href` attributes.
    ///
    /// File references become forward-slash relative paths. Inline bytes
    /// become a base64 data URI, which needs a MIME type.
    pub fn uri(&self, mime_type: Option<&str>) -> Option<String> {
        match self {
            Self::File(path) => Some(path.to_string_lossy().replace('\\', "/")),
            Self::Inline(bytes) => {
                mime_type.map(|mime| format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
            }
        }
    }
}

/// One exported artifact captured during an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name the artifact was exported under.
    pub filename: String,

    /// Content category.
    pub attachment_type: AttachmentType,

    /// Recorded name, if any.
    pub name: Option<AttachmentName>,

    /// Exported bytes or file. `None` when nothing could be exported.
    pub source: Option<RenderSource>,

    /// Indentation in pixels, inherited from the owning activity.
    pub padding: usize,
}

impl Attachment {
    /// Creates an attachment without a render source.
    pub fn new(filename: impl Into<String>, attachment_type: AttachmentType) -> Self {
        Self {
            filename: filename.into(),
            attachment_type,
            name: None,
            source: None,
            padding: 0,
        }
    }

    /// Sets the recorded name.
    #[must_use]
    pub fn with_name(mut self, name: AttachmentName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the render source.
    #[must_use]
    pub fn with_source(mut self, source: RenderSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Custom name, else a fallback derived from the type.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(AttachmentName::Custom(name)) => name,
            Some(AttachmentName::LegacyScreenImageData) | None => {
                self.attachment_type.fallback_name()
            }
        }
    }

    /// Step number encoded in the filename as `__step<N>__`.
    pub fn step(&self) -> Option<&str> {
        let (_, rest) = self.filename.split_once("__step")?;
        Some(rest.split_once("__").map_or(rest, |(step, _)| step))
    }

    /// Last component of `filename`, the only part used for files on disk.
    ///
    /// `None` when there is no such component, e.g. for `..` or `/`.
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.filename).file_name().and_then(|name| name.to_str())
    }

    /// Returns true if the filename marks a failure capture.
    pub fn is_failure(&self) -> bool {
        self.filename.contains("Failure")
    }

    /// Returns true for png and jpeg attachments.
    pub const fn is_screenshot(&self) -> bool {
        self.attachment_type.is_screenshot()
    }

    /// Returns true for attachments dropped during construction.
    pub fn is_debug_description(&self) -> bool {
        self.display_name().starts_with(DEBUG_DESCRIPTION_PREFIX)
    }

    /// URI of the rendered source, if the attachment can be rendered.
    pub fn source_uri(&self) -> Option<String> {
        self.source
            .as_ref()?
            .uri(self.attachment_type.mime_type())
    }

    /// Placeholders shared by every attachment template.
    pub(crate) fn common_placeholders(&self) -> Placeholders {
        let mut values = Placeholders::new();
        values.insert("PADDING", self.padding.to_string());
        values.insert(
            "SOURCE",
            self.source_uri().as_deref().map(escape_html).unwrap_or_default(),
        );
        values.insert("FILENAME", escape_html(&self.filename));
        values.insert("NAME", escape_html(self.display_name()));
        values.insert("TYPE_CLASS", self.attachment_type.css_class().to_string());
        values.insert(
            "STEP",
            self.step().map(escape_html).unwrap_or_default(),
        );
        values
    }
}

impl Html for Attachment {
    fn html_template(&self) -> &'static str {
        if self.source_uri().is_none() {
            return "";
        }
        match self.attachment_type {
            AttachmentType::Jpeg | AttachmentType::Png => templates::SCREENSHOT,
            AttachmentType::Data | AttachmentType::Html | AttachmentType::Text => templates::TEXT,
            AttachmentType::Unknown => "",
        }
    }

    fn html_placeholder_values(&self, _ctx: &RenderContext<'_>) -> Placeholders {
        self.common_placeholders()
    }
}
