//! The three marker operations: promote, purge and demote.
//!
//! Each operation resolves the current project and timeline itself, so they
//! can run alone or as part of [`MarkerSync::run`]. A host call that fails for
//! one marker or clip is counted and logged, and the scan carries on.

use crate::coords;
use crate::host::{self, Clip, Host, MediaRef, Project, Timeline, TrackType};
use crate::locator;
use crate::marker::{Marker, MarkerColor};
use crate::timecode::{FrameRate, Timecode};
use crate::{Error, Result};
use tracing::{debug, info, warn};

type TimelineOf<H> = <<H as Host>::Project as Project>::Timeline;

/// Marker categories used by each operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Color given to clip markers copied onto the timeline
    pub promote_color: MarkerColor,
    /// Color deleted everywhere by the purge
    pub purge_color: MarkerColor,
    /// Color given to timeline markers copied onto clips
    pub demote_color: MarkerColor,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            promote_color: MarkerColor::Red,
            purge_color: MarkerColor::Blue,
            demote_color: MarkerColor::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromoteReport {
    /// Timeline markers created
    pub copied: usize,
    /// Clip markers that could not be placed on the timeline
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Whether the host reported deleting markers on the timeline itself
    pub timeline_cleared: bool,
    /// Clips on which the host reported a deletion
    pub clips_cleared: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoteReport {
    /// Clip markers created
    pub added: usize,
    /// Timeline markers that could not be placed on their clip
    pub failed: usize,
    /// Timeline markers with no video clip underneath
    pub missed: usize,
}

/// Runs marker operations against a host
pub struct MarkerSync<H> {
    host: H,
    config: SyncConfig,
}

impl<H: Host> MarkerSync<H> {
    pub fn new(host: H, config: SyncConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Copies every marker on every video clip onto the timeline.
    ///
    /// Audio and subtitle clips are not scanned.
    pub fn promote(&self) -> Result<PromoteReport> {
        let (project, timeline) = self.open_timeline()?;
        let timeline_rate = timeline_frame_rate(&project)?;
        let color = self.config.promote_color;

        info!(%color, "Copying clip markers to timeline markers");

        let mut report = PromoteReport::default();
        for index in 1..=timeline.track_count(TrackType::Video) {
            for clip in timeline.items_in_track(TrackType::Video, index) {
                let markers = clip.markers();
                if markers.is_empty() {
                    continue;
                }

                let clip_name = clip.name();
                let clip_start = clip.start();
                let source_rate = source_frame_rate(&clip, &clip_name, timeline_rate);

                for (&clip_frame, fields) in &markers {
                    let Some(timeline_frame) = coords::to_timeline(clip_frame, clip_start) else {
                        report.failed += 1;
                        warn!(
                            clip = %clip_name,
                            clip_frame,
                            clip_start,
                            "Clip marker lies outside the timeline frame range"
                        );
                        continue;
                    };

                    let timecode = Timecode::from_frames(clip_frame, source_rate);
                    let marker = Marker::from_fields(clip_frame, fields);
                    let promoted = marker.promote(timeline_frame, &clip_name, &timecode, color);

                    if timeline.add_marker(&promoted) {
                        report.copied += 1;
                        info!(
                            marker = %promoted.name,
                            clip = %clip_name,
                            clip_frame,
                            timeline_frame,
                            "Copied clip marker to timeline"
                        );
                    } else {
                        report.failed += 1;
                        warn!(
                            clip = %clip_name,
                            clip_frame,
                            timeline_frame,
                            "Timeline refused marker copied from clip"
                        );
                    }
                }
            }
        }

        info!(
            copied = report.copied,
            failed = report.failed,
            "Finished copying clip markers"
        );
        Ok(report)
    }

    /// Deletes every marker of the purge color from the timeline and from
    /// clips on all track types.
    ///
    /// Finding nothing to delete is not a failure; only a missing project or
    /// timeline makes this return an error.
    pub fn purge(&self) -> Result<PurgeReport> {
        let (_, timeline) = self.open_timeline()?;
        let color = self.config.purge_color;

        info!(%color, "Deleting markers from timeline and all tracks");

        let timeline_cleared = timeline.delete_markers_by_color(color);
        if timeline_cleared {
            info!(%color, "Deleted timeline markers");
        } else {
            info!(%color, "No timeline markers deleted");
        }

        let mut clips_cleared = 0;
        for kind in TrackType::ALL {
            for index in 1..=timeline.track_count(kind) {
                for clip in timeline.items_in_track(kind, index) {
                    if clip.delete_markers_by_color(color) {
                        clips_cleared += 1;
                        info!(
                            %color,
                            track_type = %kind,
                            clip = %clip.name(),
                            "Deleted clip markers"
                        );
                    }
                }
            }
        }

        info!(clips_cleared, "Finished deleting markers");
        Ok(PurgeReport {
            timeline_cleared,
            clips_cleared,
        })
    }

    /// Copies every timeline marker onto the video clip underneath it.
    ///
    /// Markers over a gap are counted as missed. The new clip marker keeps the
    /// timeline marker's name; no timecode is appended.
    pub fn demote(&self) -> Result<DemoteReport> {
        let (project, timeline) = self.open_timeline()?;
        let color = self.config.demote_color;

        info!(%color, "Adding clip markers from timeline markers");

        let markers = timeline.markers();
        if markers.is_empty() {
            info!("No timeline markers found");
            return Ok(DemoteReport::default());
        }

        let timeline_rate = timeline_frame_rate(&project)?;

        if timeline.track_count(TrackType::Video) == 0 {
            info!("No video tracks found; no clip markers can be added");
            return Ok(DemoteReport::default());
        }

        let mut report = DemoteReport::default();
        for (&timeline_frame, fields) in &markers {
            let timeline_timecode = Timecode::from_frames(timeline_frame, timeline_rate);
            debug!(
                timeline_frame,
                timecode = %timeline_timecode,
                "Placing timeline marker"
            );

            let clip = locator::locate_clip(&timeline, TrackType::Video, timeline_frame);
            let Some(clip) = clip else {
                report.missed += 1;
                warn!(
                    timeline_frame,
                    "No clip found at timeline frame; marker not added"
                );
                continue;
            };

            let clip_start = clip.start();
            let Some(clip_frame) = coords::to_clip_local(timeline_frame, clip_start) else {
                report.failed += 1;
                warn!(
                    clip = %clip.name(),
                    timeline_frame,
                    clip_start,
                    "Timeline marker lies outside the clip frame range"
                );
                continue;
            };

            let marker = Marker::from_fields(timeline_frame, fields);
            let demoted = marker.demote(clip_frame, color);

            if clip.add_marker(&demoted) {
                report.added += 1;
                info!(
                    marker = %demoted.name,
                    clip = %clip.name(),
                    timeline_frame,
                    clip_frame,
                    "Added clip marker"
                );
            } else {
                report.failed += 1;
                warn!(
                    clip = %clip.name(),
                    timeline_frame,
                    "Clip refused marker from timeline"
                );
            }
        }

        info!(
            added = report.added,
            failed = report.failed,
            missed = report.missed,
            "Finished adding clip markers"
        );
        Ok(report)
    }

    fn open_timeline(&self) -> Result<(H::Project, TimelineOf<H>)> {
        let project = self.host.current_project().ok_or(Error::NoProject)?;
        let timeline = project.current_timeline().ok_or(Error::NoTimeline)?;
        Ok((project, timeline))
    }
}

/// Reads the project's timeline frame rate
pub fn timeline_frame_rate<P: Project>(project: &P) -> Result<FrameRate> {
    let key = host::TIMELINE_FRAME_RATE_SETTING;
    let value = project
        .setting(key)
        .ok_or_else(|| Error::MissingSetting(key.to_string()))?;
    FrameRate::from_setting(&value)
}

/// Reads a clip's own frame rate, falling back to the timeline's when the
/// clip has no media or the property is missing or unparsable
fn source_frame_rate<C: Clip>(clip: &C, clip_name: &str, fallback: FrameRate) -> FrameRate {
    let Some(media) = clip.media() else {
        warn!(
            clip = %clip_name,
            "Clip has no source media; using timeline frame rate for timecode"
        );
        return fallback;
    };

    match media.clip_property(host::FRAME_RATE_PROPERTY) {
        Some(value) => match value.parse() {
            Ok(rate) => rate,
            Err(_) => {
                warn!(
                    clip = %clip_name,
                    value = %value,
                    "Could not parse source frame rate; using timeline frame rate for timecode"
                );
                fallback
            }
        },
        None => {
            warn!(
                clip = %clip_name,
                "Source clip reports no frame rate; using timeline frame rate for timecode"
            );
            fallback
        }
    }
}
