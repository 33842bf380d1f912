//! In-memory host backed by a serializable project snapshot.
//!
//! Behaves like the editing application for the calls the engine makes:
//! adding a marker on an occupied frame fails, and bulk deletion reports
//! success only when something was removed. Track and item order is the
//! order of the snapshot's vectors.

use crate::host::{self, Clip, Host, MediaRef, Project, Timeline, TrackType};
use crate::marker::{Marker, MarkerColor, MarkerFields};
use crate::{FrameIndex, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type Shared = Rc<RefCell<ProjectSnapshot>>;
type MarkerMap = BTreeMap<FrameIndex, MarkerFields>;

/// A project as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// The current timeline, if one is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineSnapshot>,
}

impl ProjectSnapshot {
    /// Creates a project whose current timeline runs at `fps`
    pub fn with_timeline(fps: f64, timeline: TimelineSnapshot) -> Self {
        let key = host::TIMELINE_FRAME_RATE_SETTING.to_string();
        let settings = BTreeMap::from([(key, fps.to_string())]);
        Self {
            name: "Untitled Project".to_string(),
            settings,
            timeline: Some(timeline),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub markers: MarkerMap,
    #[serde(default)]
    pub video: Vec<TrackSnapshot>,
    #[serde(default)]
    pub audio: Vec<TrackSnapshot>,
    #[serde(default)]
    pub subtitle: Vec<TrackSnapshot>,
}

impl TimelineSnapshot {
    /// Returns the tracks of one type, in index order
    pub fn tracks(&self, kind: TrackType) -> &[TrackSnapshot] {
        match kind {
            TrackType::Video => &self.video,
            TrackType::Audio => &self.audio,
            TrackType::Subtitle => &self.subtitle,
        }
    }

    fn tracks_mut(&mut self, kind: TrackType) -> &mut Vec<TrackSnapshot> {
        match kind {
            TrackType::Video => &mut self.video,
            TrackType::Audio => &mut self.audio,
            TrackType::Subtitle => &mut self.subtitle,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    #[serde(default)]
    pub clips: Vec<ClipSnapshot>,
}

impl TrackSnapshot {
    pub fn new(clips: Vec<ClipSnapshot>) -> Self {
        Self { clips }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSnapshot {
    pub name: String,
    pub start: FrameIndex,
    /// Exclusive
    pub end: FrameIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaSnapshot>,
    /// Keyed by clip-local frame
    #[serde(default)]
    pub markers: MarkerMap,
}

impl ClipSnapshot {
    /// Creates a clip with no media reference and no markers
    pub fn new(name: &str, start: FrameIndex, end: FrameIndex) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            media: None,
            markers: MarkerMap::new(),
        }
    }

    /// Attaches media whose frame rate property reads `frame_rate`
    pub fn with_media(mut self, frame_rate: &str) -> Self {
        self.media = Some(MediaSnapshot::with_frame_rate(frame_rate));
        self
    }

    /// Adds a marker at a clip-local frame
    pub fn with_marker(mut self, frame: FrameIndex, fields: MarkerFields) -> Self {
        self.markers.insert(frame, fields);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl MediaSnapshot {
    pub fn with_frame_rate(frame_rate: &str) -> Self {
        let key = host::FRAME_RATE_PROPERTY.to_string();
        Self {
            properties: BTreeMap::from([(key, frame_rate.to_string())]),
        }
    }
}

/// Host whose single project lives in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    project: Option<Shared>,
}

impl MemoryHost {
    /// Creates a host with `project` open
    pub fn new(project: ProjectSnapshot) -> Self {
        Self {
            project: Some(Rc::new(RefCell::new(project))),
        }
    }

    /// Creates a host with no open project
    pub fn without_project() -> Self {
        Self::default()
    }

    /// Loads a host from JSON. `null` means no project is open.
    pub fn from_json(json: &str) -> Result<Self> {
        let project: Option<ProjectSnapshot> = serde_json::from_str(json)?;
        Ok(Self {
            project: project.map(|p| Rc::new(RefCell::new(p))),
        })
    }

    /// Serializes the current state of the project
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Returns a copy of the current project state
    pub fn snapshot(&self) -> Option<ProjectSnapshot> {
        self.project.as_ref().map(|p| p.borrow().clone())
    }
}

impl Host for MemoryHost {
    type Project = MemoryProject;

    fn current_project(&self) -> Option<MemoryProject> {
        self.project.clone().map(|state| MemoryProject { state })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryProject {
    state: Shared,
}

impl Project for MemoryProject {
    type Timeline = MemoryTimeline;

    fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    fn setting(&self, key: &str) -> Option<String> {
        self.state.borrow().settings.get(key).cloned()
    }

    fn current_timeline(&self) -> Option<MemoryTimeline> {
        let open = self.state.borrow().timeline.is_some();
        open.then(|| MemoryTimeline {
            state: Rc::clone(&self.state),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryTimeline {
    state: Shared,
}

impl MemoryTimeline {
    fn read<R: Default>(&self, f: impl FnOnce(&TimelineSnapshot) -> R) -> R {
        let state = self.state.borrow();
        state.timeline.as_ref().map(f).unwrap_or_default()
    }

    fn write(&self, f: impl FnOnce(&mut TimelineSnapshot) -> bool) -> bool {
        let mut state = self.state.borrow_mut();
        state.timeline.as_mut().map(f).unwrap_or(false)
    }
}

impl Timeline for MemoryTimeline {
    type Clip = MemoryClip;

    fn name(&self) -> String {
        self.read(|t| t.name.clone())
    }

    fn track_count(&self, kind: TrackType) -> usize {
        self.read(|t| t.tracks(kind).len())
    }

    fn items_in_track(&self, kind: TrackType, index: usize) -> Vec<MemoryClip> {
        let Some(track) = index.checked_sub(1) else {
            return Vec::new();
        };
        let count = self.read(|t| {
            let clips = t.tracks(kind).get(track).map(|tr| tr.clips.len());
            clips.unwrap_or(0)
        });
        (0..count)
            .map(|item| MemoryClip {
                state: Rc::clone(&self.state),
                kind,
                track,
                item,
            })
            .collect()
    }

    fn markers(&self) -> MarkerMap {
        self.read(|t| t.markers.clone())
    }

    fn add_marker(&self, marker: &Marker) -> bool {
        self.write(|t| insert_marker(&mut t.markers, marker))
    }

    fn delete_markers_by_color(&self, color: MarkerColor) -> bool {
        self.write(|t| remove_color(&mut t.markers, color))
    }
}

/// A clip addressed by its position in the snapshot
#[derive(Debug, Clone)]
pub struct MemoryClip {
    state: Shared,
    kind: TrackType,
    track: usize,
    item: usize,
}

impl MemoryClip {
    fn read<R: Default>(&self, f: impl FnOnce(&ClipSnapshot) -> R) -> R {
        let state = self.state.borrow();
        state
            .timeline
            .as_ref()
            .and_then(|t| t.tracks(self.kind).get(self.track))
            .and_then(|tr| tr.clips.get(self.item))
            .map(f)
            .unwrap_or_default()
    }

    fn write(&self, f: impl FnOnce(&mut ClipSnapshot) -> bool) -> bool {
        let mut state = self.state.borrow_mut();
        state
            .timeline
            .as_mut()
            .and_then(|t| t.tracks_mut(self.kind).get_mut(self.track))
            .and_then(|tr| tr.clips.get_mut(self.item))
            .map(f)
            .unwrap_or(false)
    }
}

impl Clip for MemoryClip {
    type Media = MemoryMedia;

    fn name(&self) -> String {
        self.read(|c| c.name.clone())
    }

    fn start(&self) -> FrameIndex {
        self.read(|c| c.start)
    }

    fn end(&self) -> FrameIndex {
        self.read(|c| c.end)
    }

    fn media(&self) -> Option<MemoryMedia> {
        self.read(|c| c.media.clone()).map(|m| MemoryMedia {
            properties: m.properties,
        })
    }

    fn markers(&self) -> MarkerMap {
        self.read(|c| c.markers.clone())
    }

    fn add_marker(&self, marker: &Marker) -> bool {
        self.write(|c| insert_marker(&mut c.markers, marker))
    }

    fn delete_markers_by_color(&self, color: MarkerColor) -> bool {
        self.write(|c| remove_color(&mut c.markers, color))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryMedia {
    properties: BTreeMap<String, String>,
}

impl MediaRef for MemoryMedia {
    fn clip_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }
}

fn insert_marker(markers: &mut MarkerMap, marker: &Marker) -> bool {
    if marker.position < 0 || marker.duration == 0 || markers.contains_key(&marker.position) {
        return false;
    }
    markers.insert(marker.position, marker.to_fields());
    true
}

fn remove_color(markers: &mut MarkerMap, color: MarkerColor) -> bool {
    let before = markers.len();
    markers.retain(|_, fields| fields.color_or_default() != color);
    markers.len() < before
}
