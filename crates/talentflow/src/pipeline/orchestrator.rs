use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::input::{format_file_size, CandidateInput};
use crate::validate::{validate, ValidationPolicy};

use super::preview::AnalysisPreview;
use super::progress::{NoopProgress, ProgressEvent, ProgressReporter};
use super::runner::{CancelToken, StageOutcome, StageProgress, StageRunner};
use super::stage::{Stage, StagePayload, StageStatus};
use super::tracker::{PipelineRun, StageTracker};

/// Terminal result of one pipeline run. Exactly one of these is produced per
/// `run` call that gets past validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Success {
        preview: Option<AnalysisPreview>,
        stage_history: Vec<Stage>,
    },
    Failure {
        failed_stage_id: String,
        reason: String,
    },
    /// The caller abandoned the run; no result sink handler is invoked.
    Cancelled,
}

/// Everything a consumer needs to render a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub final_preview: Option<AnalysisPreview>,
    pub stage_history: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub failed_stage_id: String,
    pub reason: String,
}

/// External collaborator invoked once per terminal outcome. The core performs
/// no navigation, persistence or notification itself.
pub trait ResultSink: Send + Sync {
    fn on_success(&self, summary: &RunSummary);
    fn on_failure(&self, failure: &RunFailure);
}

/// Sink that ignores outcomes, for unit tests.
pub struct NoopSink;

impl ResultSink for NoopSink {
    fn on_success(&self, _summary: &RunSummary) {}
    fn on_failure(&self, _failure: &RunFailure) {}
}

/// Drives stage runners strictly in supply order, wiring their progress and
/// outcomes into the stage tracker and deciding whether to continue, abort or
/// finish. One orchestrator serves one submission; independent uploads get
/// independent orchestrators.
pub struct PipelineOrchestrator {
    policy: ValidationPolicy,
    tracker: Arc<Mutex<StageTracker>>,
    reporter: Arc<dyn ProgressReporter>,
    cancel: CancelToken,
}

impl PipelineOrchestrator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self::with_reporter(policy, Arc::new(NoopProgress))
    }

    pub fn with_reporter(policy: ValidationPolicy, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self {
            policy,
            tracker: Arc::new(Mutex::new(StageTracker::new())),
            reporter,
            cancel: CancelToken::new(),
        }
    }

    /// Handle the caller keeps to abandon the run from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Abandons the run: stops event forwarding and discards the tracker.
    pub fn abandon(&self) {
        self.cancel.cancel();
        self.tracker_guard().discard();
    }

    /// Immutable view of the active run for rendering.
    pub fn snapshot(&self) -> Option<PipelineRun> {
        self.tracker_guard().snapshot()
    }

    /// Runs the full pipeline for one input. Validation failures and tracker
    /// misuse surface as `Err`; stage failures are data, reported through
    /// `PipelineOutcome::Failure` and the sink.
    pub async fn run(
        &self,
        input: &CandidateInput,
        runners: &[Box<dyn StageRunner>],
        sink: &dyn ResultSink,
    ) -> Result<PipelineOutcome> {
        // Rejected inputs never create a run.
        validate(input, &self.policy)?;

        if self.cancel.is_cancelled() {
            return Ok(PipelineOutcome::Cancelled);
        }

        let defs: Vec<_> = runners.iter().map(|r| r.definition()).collect();
        self.tracker_guard().initialize(&input.name, &defs)?;
        info!(
            file = %input.name,
            size = %format_file_size(input.size_bytes),
            stages = defs.len(),
            "pipeline run started"
        );

        for (idx, runner) in runners.iter().enumerate() {
            if self.cancel.is_cancelled() {
                debug!(file = %input.name, "run abandoned before stage start");
                return Ok(PipelineOutcome::Cancelled);
            }

            let def = &defs[idx];
            if idx > 0 {
                self.tracker_guard()
                    .transition(&def.id, StageStatus::Processing, None)?;
            }
            self.reporter.report(ProgressEvent::StageStarted {
                stage_id: def.id.clone(),
                message: def.description.clone(),
            });

            let progress = TrackerProgress {
                stage_id: def.id.clone(),
                tracker: Arc::clone(&self.tracker),
                reporter: Arc::clone(&self.reporter),
                cancel: self.cancel.clone(),
            };
            let outcome = runner.start(input, &progress, &self.cancel).await;

            if self.cancel.is_cancelled() {
                // Late result from an abandoned run; nothing else is mutated.
                debug!(stage_id = %def.id, "discarding outcome of abandoned run");
                return Ok(PipelineOutcome::Cancelled);
            }

            match outcome {
                StageOutcome::Success { payload } => {
                    let preview = payload
                        .as_ref()
                        .and_then(StagePayload::as_preview)
                        .cloned();
                    {
                        let mut tracker = self.tracker_guard();
                        tracker.transition(&def.id, StageStatus::Completed, payload)?;
                        if let Some(preview) = preview {
                            tracker.set_preview(preview);
                        }
                    }
                    self.reporter.report(ProgressEvent::StageCompleted {
                        stage_id: def.id.clone(),
                    });
                }
                StageOutcome::Failure { reason } => {
                    warn!(stage_id = %def.id, %reason, "stage failed, aborting run");
                    {
                        let mut tracker = self.tracker_guard();
                        tracker.transition(&def.id, StageStatus::Error, None)?;
                        tracker.record_error(&def.id, &reason)?;
                    }
                    self.reporter.report(ProgressEvent::Failed {
                        stage_id: def.id.clone(),
                        reason: reason.clone(),
                    });

                    let failure = RunFailure {
                        failed_stage_id: def.id.clone(),
                        reason: reason.clone(),
                    };
                    sink.on_failure(&failure);
                    return Ok(PipelineOutcome::Failure {
                        failed_stage_id: failure.failed_stage_id,
                        reason: failure.reason,
                    });
                }
            }
        }

        let (preview, stage_history) = match self.tracker_guard().snapshot() {
            Some(run) => (run.preview, run.stages),
            None => (None, Vec::new()),
        };

        info!(file = %input.name, "pipeline run completed");
        self.reporter.report(ProgressEvent::Completed {
            preview: preview.clone(),
        });
        sink.on_success(&RunSummary {
            final_preview: preview.clone(),
            stage_history: stage_history.clone(),
        });

        Ok(PipelineOutcome::Success {
            preview,
            stage_history,
        })
    }

    // A poisoned lock only means another observer panicked mid-read; tracker
    // state itself stays consistent, so recover the guard.
    fn tracker_guard(&self) -> MutexGuard<'_, StageTracker> {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Forwards a runner's progress reports into the tracker and the reporter.
/// Reports arriving after the run was abandoned are dropped.
struct TrackerProgress {
    stage_id: String,
    tracker: Arc<Mutex<StageTracker>>,
    reporter: Arc<dyn ProgressReporter>,
    cancel: CancelToken,
}

impl StageProgress for TrackerProgress {
    fn progress(&self, percent: u8) {
        if self.cancel.is_cancelled() {
            return;
        }
        let mut tracker = self
            .tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = tracker.update_progress(&self.stage_id, percent) {
            warn!(stage_id = %self.stage_id, %err, "dropping progress report");
            return;
        }
        // Released before the reporter runs; reporters may take snapshots.
        drop(tracker);
        self.reporter.report(ProgressEvent::StageProgress {
            stage_id: self.stage_id.clone(),
            percent,
        });
    }
}
