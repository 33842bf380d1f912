//! Translation between clip-local and timeline frame indices

use crate::FrameIndex;

/// Maps a frame inside a clip to its position on the timeline.
///
/// Returns `None` if the result does not fit a frame index.
pub fn to_timeline(
    clip_local_frame: FrameIndex,
    clip_timeline_start: FrameIndex,
) -> Option<FrameIndex> {
    clip_timeline_start.checked_add(clip_local_frame)
}

/// Maps a timeline frame to the matching frame inside a clip.
///
/// The result is not bounds-checked against the clip's span. Returns `None`
/// if it does not fit a frame index.
pub fn to_clip_local(
    timeline_frame: FrameIndex,
    clip_timeline_start: FrameIndex,
) -> Option<FrameIndex> {
    timeline_frame.checked_sub(clip_timeline_start)
}

/// Half-open span `[start, end)` a clip occupies on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl Placement {
    /// Creates a placement
    pub fn new(start: FrameIndex, end: FrameIndex) -> Self {
        Self { start, end }
    }

    /// Checks if the given timeline frame falls inside this placement
    pub fn contains(&self, timeline_frame: FrameIndex) -> bool {
        timeline_frame >= self.start && timeline_frame < self.end
    }
}
