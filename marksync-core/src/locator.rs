//! Finding the clip under a timeline frame

use crate::coords::Placement;
use crate::host::{Clip, Timeline, TrackType};
use crate::FrameIndex;

/// Returns the span a clip occupies on the timeline
pub fn placement_of<C: Clip>(clip: &C) -> Placement {
    Placement::new(clip.start(), clip.end())
}

/// Finds the first clip of `kind` whose span contains `timeline_frame`.
///
/// Tracks are scanned in ascending index order and items in the order the
/// host lists them; the first hit wins, so overlapping clips resolve to the
/// earliest one scanned.
pub fn locate_clip<T: Timeline>(
    timeline: &T,
    kind: TrackType,
    timeline_frame: FrameIndex,
) -> Option<T::Clip> {
    (1..=timeline.track_count(kind)).find_map(|index| {
        timeline
            .items_in_track(kind, index)
            .into_iter()
            .find(|clip| placement_of(clip).contains(timeline_frame))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Host, Project};
    use crate::memory::{
        ClipSnapshot, MemoryHost, ProjectSnapshot, TimelineSnapshot, TrackSnapshot,
    };

    fn host_for(timeline: TimelineSnapshot) -> MemoryHost {
        MemoryHost::new(ProjectSnapshot::with_timeline(24.0, timeline))
    }

    fn host_with_tracks(video: Vec<TrackSnapshot>) -> MemoryHost {
        host_for(TimelineSnapshot {
            video,
            ..Default::default()
        })
    }

    fn locate_name(host: &MemoryHost, kind: TrackType, frame: FrameIndex) -> Option<String> {
        let timeline = host.current_project()?.current_timeline()?;
        locate_clip(&timeline, kind, frame).map(|c| c.name())
    }

    fn video_at(host: &MemoryHost, frame: FrameIndex) -> Option<String> {
        locate_name(host, TrackType::Video, frame)
    }

    #[test]
    fn test_finds_containing_clip() {
        let host = host_with_tracks(vec![TrackSnapshot::new(vec![
            ClipSnapshot::new("A", 0, 100),
            ClipSnapshot::new("B", 100, 200),
        ])]);

        assert_eq!(video_at(&host, 0).as_deref(), Some("A"));
        assert_eq!(video_at(&host, 99).as_deref(), Some("A"));
        assert_eq!(video_at(&host, 100).as_deref(), Some("B"));
        assert_eq!(video_at(&host, 200), None);
    }

    #[test]
    fn test_lower_track_wins() {
        let host = host_with_tracks(vec![
            TrackSnapshot::new(vec![ClipSnapshot::new("V1", 50, 150)]),
            TrackSnapshot::new(vec![ClipSnapshot::new("V2", 0, 300)]),
        ]);

        assert_eq!(video_at(&host, 60).as_deref(), Some("V1"));
        assert_eq!(video_at(&host, 10).as_deref(), Some("V2"));
    }

    #[test]
    fn test_overlap_resolves_to_first_listed() {
        let host = host_with_tracks(vec![TrackSnapshot::new(vec![
            ClipSnapshot::new("late", 40, 80),
            ClipSnapshot::new("early", 0, 60),
        ])]);

        assert_eq!(video_at(&host, 50).as_deref(), Some("late"));
    }

    #[test]
    fn test_other_track_types_ignored() {
        let host = host_for(TimelineSnapshot {
            audio: vec![TrackSnapshot::new(vec![ClipSnapshot::new("VO", 0, 100)])],
            subtitle: vec![TrackSnapshot::new(vec![ClipSnapshot::new("ST", 0, 100)])],
            ..Default::default()
        });

        assert_eq!(video_at(&host, 50), None);
        let audio = locate_name(&host, TrackType::Audio, 50);
        assert_eq!(audio.as_deref(), Some("VO"));
        let subtitle = locate_name(&host, TrackType::Subtitle, 50);
        assert_eq!(subtitle.as_deref(), Some("ST"));
    }

    #[test]
    fn test_empty_timeline() {
        let host = host_with_tracks(vec![]);
        assert_eq!(video_at(&host, 0), None);
    }
}
