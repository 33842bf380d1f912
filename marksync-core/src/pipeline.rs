//! The combined promote, purge, demote run

use crate::host::Host;
use crate::propagate::{DemoteReport, MarkerSync, PromoteReport, PurgeReport};
use crate::{Error, Result};
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Promote,
    Purge,
    Demote,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Promote => "clip markers to timeline",
            Phase::Purge => "purge markers",
            Phase::Demote => "timeline markers to clips",
        };
        f.write_str(label)
    }
}

/// What happened to one phase of a run
#[derive(Debug)]
pub enum PhaseResult<T> {
    /// The run stopped before reaching this phase
    Skipped,
    Completed(T),
    Failed(Error),
}

impl<T> PhaseResult<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PhaseResult::Completed(_))
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            PhaseResult::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            PhaseResult::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for PhaseResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(report) => PhaseResult::Completed(report),
            Err(err) => PhaseResult::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Done,
    Aborted(Phase),
}

#[derive(Debug)]
pub struct RunSummary {
    pub promote: PhaseResult<PromoteReport>,
    pub purge: PhaseResult<PurgeReport>,
    pub demote: PhaseResult<DemoteReport>,
    pub state: RunState,
}

impl RunSummary {
    /// True when promote and demote both completed. The purge outcome does not count.
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Done && self.promote.is_completed() && self.demote.is_completed()
    }
}

impl<H: Host> MarkerSync<H> {
    /// Runs promote, purge and demote in that order.
    ///
    /// A failed promote stops the run before anything else happens. A failed
    /// purge is logged and the run continues. A failed demote marks the run
    /// aborted, but whatever promote and purge already changed stays changed.
    pub fn run(&self) -> RunSummary {
        info!("Starting combined marker run");

        let promote = PhaseResult::from(self.promote());
        if let Some(err) = promote.error() {
            error!(phase = %Phase::Promote, %err, "Phase failed; aborting run");
            return RunSummary {
                promote,
                purge: PhaseResult::Skipped,
                demote: PhaseResult::Skipped,
                state: RunState::Aborted(Phase::Promote),
            };
        }

        let purge = PhaseResult::from(self.purge());
        if let Some(err) = purge.error() {
            warn!(phase = %Phase::Purge, %err, "Phase failed; continuing");
        }

        let demote = PhaseResult::from(self.demote());
        let state = match demote.error() {
            Some(err) => {
                error!(
                    phase = %Phase::Demote,
                    %err,
                    "Phase failed; run is incomplete"
                );
                RunState::Aborted(Phase::Demote)
            }
            None => {
                info!("Combined marker run completed");
                RunState::Done
            }
        };

        RunSummary {
            promote,
            purge,
            demote,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryHost, ProjectSnapshot, TimelineSnapshot};
    use crate::propagate::SyncConfig;

    #[test]
    fn test_no_project_aborts_at_promote() {
        let sync = MarkerSync::new(MemoryHost::without_project(), SyncConfig::default());
        let summary = sync.run();

        assert_eq!(summary.state, RunState::Aborted(Phase::Promote));
        assert!(matches!(
            summary.promote,
            PhaseResult::Failed(Error::NoProject)
        ));
        assert!(matches!(summary.purge, PhaseResult::Skipped));
        assert!(matches!(summary.demote, PhaseResult::Skipped));
        assert!(!summary.succeeded());
    }

    #[test]
    fn test_no_timeline_aborts_at_promote() {
        let host = MemoryHost::new(ProjectSnapshot::default());
        let summary = MarkerSync::new(host, SyncConfig::default()).run();

        assert!(matches!(
            summary.promote,
            PhaseResult::Failed(Error::NoTimeline)
        ));
        assert!(!summary.succeeded());
    }

    #[test]
    fn test_empty_timeline_succeeds() {
        let project = ProjectSnapshot::with_timeline(24.0, TimelineSnapshot::default());
        let host = MemoryHost::new(project);
        let summary = MarkerSync::new(host, SyncConfig::default()).run();

        assert_eq!(summary.state, RunState::Done);
        assert_eq!(summary.promote.report(), Some(&PromoteReport::default()));
        assert!(summary.purge.is_completed());
        assert!(summary.succeeded());
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Promote.to_string(), "clip markers to timeline");
        assert_eq!(Phase::Demote.to_string(), "timeline markers to clips");
    }
}
