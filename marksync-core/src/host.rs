//! Capability surface of the editing application.
//!
//! Handles are proxies into the host and are returned by value. Every call
//! is synchronous and its effects are visible to the next call. Iteration
//! order of tracks, items and markers is whatever the host reports, and the
//! clip locator relies on it for tie-breaking.

use crate::marker::{Marker, MarkerColor, MarkerFields};
use crate::FrameIndex;
use std::collections::BTreeMap;
use std::fmt;

/// Project setting holding the timeline frame rate
pub const TIMELINE_FRAME_RATE_SETTING: &str = "timelineFrameRate";

/// Media clip property holding the source frame rate
pub const FRAME_RATE_PROPERTY: &str = "Frame Rate";

/// Kinds of track a timeline holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
}

impl TrackType {
    pub const ALL: [TrackType; 3] = [TrackType::Video, TrackType::Audio, TrackType::Subtitle];

    /// Returns the host's name for this track type
    pub fn as_str(self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point into the editing application
pub trait Host {
    type Project: Project;

    fn current_project(&self) -> Option<Self::Project>;
}

pub trait Project {
    type Timeline: Timeline;

    fn name(&self) -> String;

    fn setting(&self, key: &str) -> Option<String>;

    fn current_timeline(&self) -> Option<Self::Timeline>;
}

pub trait Timeline {
    type Clip: Clip;

    fn name(&self) -> String;

    fn track_count(&self, kind: TrackType) -> usize;

    /// Items on a track. `index` is 1-based.
    fn items_in_track(&self, kind: TrackType, index: usize) -> Vec<Self::Clip>;

    fn markers(&self) -> BTreeMap<FrameIndex, MarkerFields>;

    /// Adds a marker at `marker.position`; returns false if the host refused it
    fn add_marker(&self, marker: &Marker) -> bool;

    fn delete_markers_by_color(&self, color: MarkerColor) -> bool;
}

pub trait Clip {
    type Media: MediaRef;

    fn name(&self) -> String;

    /// First timeline frame the clip covers
    fn start(&self) -> FrameIndex;

    /// Timeline frame just past the clip
    fn end(&self) -> FrameIndex;

    fn media(&self) -> Option<Self::Media>;

    /// Markers keyed by clip-local frame
    fn markers(&self) -> BTreeMap<FrameIndex, MarkerFields>;

    fn add_marker(&self, marker: &Marker) -> bool;

    fn delete_markers_by_color(&self, color: MarkerColor) -> bool;
}

/// Source media behind a clip
pub trait MediaRef {
    fn clip_property(&self, key: &str) -> Option<String>;
}
