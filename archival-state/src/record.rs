use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A record ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub SmolStr);
impl RecordId {
    /// Creates a record ID from anything string-like.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An archival record, as the workstation cares about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record ID
    pub id: RecordId,
    /// Position in catalog order. Assigned by [`crate::Catalog`], never read from disk.
    #[serde(skip)]
    pub index: usize,
    /// Short index code printed on the folder tab
    #[serde(default)]
    pub code: SmolStr,
    /// The record title
    pub title: String,
    /// Free-form description shown when the record is focused
    #[serde(default)]
    pub description: String,
    /// Categorisation tags
    #[serde(default)]
    pub tags: Vec<SmolStr>,
    /// Reference to the record's image (a path or URL, interpreted by the viewer)
    #[serde(alias = "image_url")]
    pub image_ref: String,
    /// Image width / height
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,
    /// Folder colour as a `#rrggbb` hex string
    #[serde(default = "default_color")]
    pub color: String,
    /// Signal log values drawn as a small chart
    #[serde(default)]
    pub stats: Vec<f32>,
}
impl Record {
    /// Returns the folder colour as RGB, or `None` if it isn't a valid `#rrggbb` string.
    pub fn color_rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }

    /// Whether the folder is the dark variant, which flips text to light colours.
    pub fn is_dark(&self) -> bool {
        self.color.eq_ignore_ascii_case(DARK_FOLDER_COLOR)
    }
}

/// The one folder colour that is drawn with light text.
pub const DARK_FOLDER_COLOR: &str = "#2C2B29";

fn default_aspect_ratio() -> f32 {
    1.0
}

fn default_color() -> String {
    "#E8E4D9".to_string()
}
