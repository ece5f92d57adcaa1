//! Value types exchanged with the download and preview collaborators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default container extension for stored videos.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Longest display name a video record may carry, in characters.
pub const MAX_VIDEO_NAME_CHARS: usize = 100;

/// Where a download request points.
///
/// Parsing is lenient: `youtube` selects [`SourceKind::YouTube`] and any
/// other value falls back to a plain HTTP fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain HTTP GET of the media URL.
    General,
    /// YouTube watch URL resolved through an extractor.
    #[serde(rename = "youtube")]
    YouTube,
}

impl SourceKind {
    /// Wire name of the source kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::YouTube => "youtube",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "youtube" => Self::YouTube,
            _ => Self::General,
        })
    }
}

/// Result of a completed download strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedVideo {
    /// Human-readable display name.
    pub name: String,
    /// Path of the media file relative to the video root.
    pub real_path: String,
}

/// Strip characters that are not allowed in file names on common filesystems.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cut `name` to at most `max` characters, trimming any trailing whitespace
/// left at the cut.
pub fn truncate_chars(name: &str, max: usize) -> String {
    match name.char_indices().nth(max) {
        Some((end, _)) => name[..end].trim_end().to_string(),
        None => name.to_string(),
    }
}
