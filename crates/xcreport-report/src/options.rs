//! Rendering and relocation options shared by the builder and the assembler.

use serde::{Deserialize, Serialize};

/// How exported payloads end up in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderingMode {
    /// Payloads are written next to the document and linked by relative path.
    #[default]
    Linking,
    /// Payloads are embedded as base64 data URIs.
    Inline,
}

impl RenderingMode {
    /// Parses a string into a `RenderingMode`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linking" => Some(Self::Linking),
            "inline" => Some(Self::Inline),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RenderingMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid rendering mode '{s}': expected one of 'linking', 'inline'"
            ))
        })
    }
}

impl Serialize for RenderingMode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Linking => "linking",
            Self::Inline => "inline",
        };
        serializer.serialize_str(s)
    }
}

/// What happens to a test's attachment files when its isolated report is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachmentRelocation {
    /// Move files out of the shared store. Links in the full report break.
    #[default]
    Move,
    /// Copy files, leaving the shared store intact.
    Copy,
}

impl AttachmentRelocation {
    /// Parses a string into an `AttachmentRelocation`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "move" => Some(Self::Move),
            "copy" => Some(Self::Copy),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for AttachmentRelocation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid attachment relocation '{s}': expected one of 'move', 'copy'"
            ))
        })
    }
}

impl Serialize for AttachmentRelocation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Move => "move",
            Self::Copy => "copy",
        };
        serializer.serialize_str(s)
    }
}
