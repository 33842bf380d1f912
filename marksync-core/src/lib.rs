//! Marksync Core Library
//!
//! This library moves marker annotations between the two frame spaces of an
//! edit: the global timeline space and the local source space of each clip.
//! The editing application itself is reached only through the capability
//! traits in [`host`], so the propagation logic runs the same against a live
//! editor or the in-memory [`memory::MemoryHost`].

pub mod coords;
pub mod host;
pub mod locator;
pub mod marker;
pub mod memory;
pub mod pipeline;
pub mod propagate;
pub mod timecode;

pub use host::{Clip, Host, MediaRef, Project, Timeline, TrackType};
pub use marker::{Marker, MarkerColor, MarkerFields};
pub use memory::{
    ClipSnapshot, MediaSnapshot, MemoryHost, ProjectSnapshot, TimelineSnapshot, TrackSnapshot,
};
pub use pipeline::{Phase, PhaseResult, RunState, RunSummary};
pub use propagate::{DemoteReport, MarkerSync, PromoteReport, PurgeReport, SyncConfig};
pub use timecode::{FrameRate, Timecode};

/// Frame position, either on the timeline or inside a clip's source.
pub type FrameIndex = i64;

/// Result type for marksync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for marksync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No project is currently open")]
    NoProject,

    #[error("No timeline is currently open in the project")]
    NoTimeline,

    #[error("Missing project setting: {0}")]
    MissingSetting(String),

    #[error("Invalid frame rate: {0:?}")]
    InvalidFrameRate(String),

    #[error("Unknown marker color: {0}")]
    UnknownColor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
