use crate::broadcast::run_progress::RunProgressTracker;

use super::preview::AnalysisPreview;

/// Events emitted by the orchestrator while a run is in flight.
pub enum ProgressEvent {
    StageStarted {
        stage_id: String,
        message: String,
    },
    StageProgress {
        stage_id: String,
        percent: u8,
    },
    StageCompleted {
        stage_id: String,
    },
    Completed {
        preview: Option<AnalysisPreview>,
    },
    Failed {
        stage_id: String,
        reason: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Bridges orchestrator events onto a run progress broadcast channel.
pub struct BroadcastProgress {
    tracker: RunProgressTracker,
}

impl BroadcastProgress {
    pub fn new(tracker: RunProgressTracker) -> Self {
        Self { tracker }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage_id, message } => {
                self.tracker.stage_started(&stage_id, &message);
            }
            ProgressEvent::StageProgress { stage_id, percent } => {
                self.tracker.stage_progress(&stage_id, percent);
            }
            ProgressEvent::StageCompleted { stage_id } => {
                self.tracker.stage_completed(&stage_id);
            }
            ProgressEvent::Completed { preview } => {
                self.tracker.completed(preview);
            }
            ProgressEvent::Failed { stage_id, reason } => {
                self.tracker.failed(&stage_id, &reason);
            }
        }
    }
}
