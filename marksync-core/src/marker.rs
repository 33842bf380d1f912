//! Marker records and the naming policy applied when markers change space

use crate::timecode::Timecode;
use crate::{Error, FrameIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder token the host puts in names the editor never typed
const UNNAMED_TOKEN: &str = "Unnamed";

/// Name given to a promoted marker whose source had no usable name
pub const PROMOTED_FALLBACK_NAME: &str = "Clip Marker";

/// Name given to a demoted marker whose source had no usable name
pub const DEMOTED_FALLBACK_NAME: &str = "Timeline Marker";

/// Note given to a demoted marker whose source had no note
pub const DEMOTED_FALLBACK_NOTE: &str = "Added based on timeline marker position";

/// Marker categories known to the host. The category is both the visual
/// color and the selector for bulk deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerColor {
    Blue,
    Cyan,
    Green,
    Yellow,
    Red,
    Pink,
    Purple,
    Fuchsia,
    Rose,
    Lavender,
    Sky,
    Mint,
    Lemon,
    Sand,
    Cocoa,
    Cream,
}

impl MarkerColor {
    pub const ALL: [MarkerColor; 16] = [
        MarkerColor::Blue,
        MarkerColor::Cyan,
        MarkerColor::Green,
        MarkerColor::Yellow,
        MarkerColor::Red,
        MarkerColor::Pink,
        MarkerColor::Purple,
        MarkerColor::Fuchsia,
        MarkerColor::Rose,
        MarkerColor::Lavender,
        MarkerColor::Sky,
        MarkerColor::Mint,
        MarkerColor::Lemon,
        MarkerColor::Sand,
        MarkerColor::Cocoa,
        MarkerColor::Cream,
    ];

    /// Returns the host's name for this color
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerColor::Blue => "Blue",
            MarkerColor::Cyan => "Cyan",
            MarkerColor::Green => "Green",
            MarkerColor::Yellow => "Yellow",
            MarkerColor::Red => "Red",
            MarkerColor::Pink => "Pink",
            MarkerColor::Purple => "Purple",
            MarkerColor::Fuchsia => "Fuchsia",
            MarkerColor::Rose => "Rose",
            MarkerColor::Lavender => "Lavender",
            MarkerColor::Sky => "Sky",
            MarkerColor::Mint => "Mint",
            MarkerColor::Lemon => "Lemon",
            MarkerColor::Sand => "Sand",
            MarkerColor::Cocoa => "Cocoa",
            MarkerColor::Cream => "Cream",
        }
    }
}

impl FromStr for MarkerColor {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownColor(s.to_string()))
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker fields as the host reports them. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
}

impl MarkerFields {
    /// Returns the color, or the host's default (Blue) when none was reported
    pub fn color_or_default(&self) -> MarkerColor {
        self.color.unwrap_or(MarkerColor::Blue)
    }
}

/// A marker with host defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Frame the marker sits on, in the space of whatever owns it
    pub position: FrameIndex,
    pub color: MarkerColor,
    pub name: String,
    /// `None` when the host reported no note at all
    pub note: Option<String>,
    /// Length in frames, at least 1
    pub duration: u64,
    /// Opaque payload carried across unchanged
    pub custom_data: String,
}

impl Marker {
    /// Normalizes a host record. Missing or zero duration becomes 1 and a
    /// missing payload becomes empty.
    pub fn from_fields(position: FrameIndex, fields: &MarkerFields) -> Self {
        Self {
            position,
            color: fields.color_or_default(),
            name: fields.name.clone().unwrap_or_default(),
            note: fields.note.clone(),
            duration: fields.duration.filter(|d| *d >= 1).unwrap_or(1),
            custom_data: fields.custom_data.clone().unwrap_or_default(),
        }
    }

    /// Converts back into the host's record form
    pub fn to_fields(&self) -> MarkerFields {
        MarkerFields {
            color: Some(self.color),
            name: Some(self.name.clone()),
            note: self.note.clone(),
            duration: Some(self.duration),
            custom_data: Some(self.custom_data.clone()),
        }
    }

    /// Builds the timeline marker for this clip marker.
    ///
    /// The name gets a ` @ Clip HH:MM:SS` suffix with the marker's source
    /// timecode; an empty note is replaced with one naming the clip.
    pub fn promote(
        &self,
        timeline_frame: FrameIndex,
        clip_name: &str,
        source_timecode: &Timecode,
        color: MarkerColor,
    ) -> Marker {
        let base = base_name(&self.name, PROMOTED_FALLBACK_NAME);
        let name = format!("{base} @ Clip {source_timecode}");
        let name = name.trim().to_string();
        let note = match self.note.as_deref() {
            Some(note) if !note.is_empty() => note.to_string(),
            _ => format!("Copied from clip '{clip_name}' at Clip {source_timecode}"),
        };

        Marker {
            position: timeline_frame,
            color,
            name,
            note: Some(note),
            duration: self.duration,
            custom_data: self.custom_data.clone(),
        }
    }

    /// Builds the clip marker for this timeline marker.
    ///
    /// Unlike [`Marker::promote`], no timecode is added to the name or note.
    pub fn demote(&self, clip_local_frame: FrameIndex, color: MarkerColor) -> Marker {
        let note = self
            .note
            .clone()
            .unwrap_or_else(|| DEMOTED_FALLBACK_NOTE.to_string());

        Marker {
            position: clip_local_frame,
            color,
            name: base_name(&self.name, DEMOTED_FALLBACK_NAME),
            note: Some(note),
            duration: self.duration,
            custom_data: self.custom_data.clone(),
        }
    }
}

/// Strips every `Unnamed` token, falling back when nothing is left
fn base_name(name: &str, fallback: &str) -> String {
    let stripped = name.replace(UNNAMED_TOKEN, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        fallback.to_string()
    } else {
        stripped.to_string()
    }
}
