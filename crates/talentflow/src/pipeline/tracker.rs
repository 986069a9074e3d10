use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrackerError;

use super::preview::AnalysisPreview;
use super::stage::{Stage, StageDefinition, StagePayload, StageStatus};

/// Overall status of a run, derived from its stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Processing,
    Completed,
    Error,
}

/// The ordered sequence of stages for one candidate input, as observed at a
/// point in time. Snapshots are plain clones; mutating one never touches the
/// tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub id: String,
    /// Display name of the input being processed.
    pub input_name: String,
    pub stages: Vec<Stage>,
    /// Latest preview surfaced by a completed stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<AnalysisPreview>,
}

impl PipelineRun {
    /// Derives the run status: error wins, then completion of the last stage,
    /// then processing once anything has started.
    pub fn status(&self) -> RunStatus {
        if self.stages.iter().any(|s| s.status == StageStatus::Error) {
            return RunStatus::Error;
        }
        if self
            .stages
            .last()
            .is_some_and(|s| s.status == StageStatus::Completed)
        {
            return RunStatus::Completed;
        }
        if self
            .stages
            .iter()
            .any(|s| s.status != StageStatus::Pending)
        {
            return RunStatus::Processing;
        }
        RunStatus::Idle
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }
}

/// Owns the stage records of the active run and is the only place they are
/// mutated. At most one run is active per tracker instance; independent
/// submissions need independent trackers.
#[derive(Debug, Default)]
pub struct StageTracker {
    run: Option<PipelineRun>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the run: every stage pending except the first, which starts
    /// processing at 0%. Fails with `AlreadyRunning` while a previous run is
    /// still in flight; a terminal run is replaced silently.
    pub fn initialize(
        &mut self,
        input_name: &str,
        defs: &[StageDefinition],
    ) -> Result<(), TrackerError> {
        if self
            .run
            .as_ref()
            .is_some_and(|run| run.status() == RunStatus::Processing)
        {
            return Err(TrackerError::AlreadyRunning);
        }

        let mut stages: Vec<Stage> = defs.iter().map(Stage::pending).collect();
        if let Some(first) = stages.first_mut() {
            first.status = StageStatus::Processing;
            first.progress = Some(0);
        }

        self.run = Some(PipelineRun {
            id: uuid::Uuid::new_v4().to_string(),
            input_name: input_name.to_string(),
            stages,
            preview: None,
        });

        Ok(())
    }

    /// Updates a stage's percent complete. Values above 100 are clamped and
    /// decreases are ignored: progress is monotonic non-decreasing. Updates to
    /// a stage that is not processing are dropped silently, since progress is
    /// only meaningful while a stage is active.
    pub fn update_progress(&mut self, stage_id: &str, percent: u8) -> Result<(), TrackerError> {
        let stage = self.stage_mut(stage_id)?;
        if stage.status != StageStatus::Processing {
            return Ok(());
        }
        let clamped = percent.min(100);
        stage.progress = Some(stage.progress.unwrap_or(0).max(clamped));
        Ok(())
    }

    /// Applies a status transition. Legal moves are pending -> processing,
    /// processing -> completed (with optional payload) and processing ->
    /// error. Completing a stage never advances the next one; sequencing is
    /// the orchestrator's job.
    pub fn transition(
        &mut self,
        stage_id: &str,
        new_status: StageStatus,
        payload: Option<StagePayload>,
    ) -> Result<(), TrackerError> {
        let stage = self.stage_mut(stage_id)?;

        match (stage.status, new_status) {
            (StageStatus::Pending, StageStatus::Processing) => {
                stage.status = StageStatus::Processing;
                stage.progress = Some(0);
            }
            (StageStatus::Processing, StageStatus::Completed) => {
                stage.status = StageStatus::Completed;
                stage.payload = payload;
            }
            (StageStatus::Processing, StageStatus::Error) => {
                stage.status = StageStatus::Error;
            }
            (from, to) => {
                return Err(TrackerError::IllegalTransition {
                    stage_id: stage_id.to_string(),
                    from,
                    to,
                });
            }
        }

        debug!(stage_id, status = %new_status, "stage transition");
        Ok(())
    }

    /// Attaches a failure reason to a stage. Kept separate from `transition`
    /// so the transition table stays payload-shaped.
    pub fn record_error(&mut self, stage_id: &str, reason: &str) -> Result<(), TrackerError> {
        let stage = self.stage_mut(stage_id)?;
        stage.error = Some(reason.to_string());
        Ok(())
    }

    /// Records the run's current preview, replacing any prior one.
    pub fn set_preview(&mut self, preview: AnalysisPreview) {
        if let Some(run) = self.run.as_mut() {
            run.preview = Some(preview);
        }
    }

    /// Immutable view of the active run, reflecting the latest mutation.
    pub fn snapshot(&self) -> Option<PipelineRun> {
        self.run.clone()
    }

    /// Drops the active run, e.g., when the caller removes the selected input.
    pub fn discard(&mut self) {
        self.run = None;
    }

    fn stage_mut(&mut self, stage_id: &str) -> Result<&mut Stage, TrackerError> {
        self.run
            .as_mut()
            .and_then(|run| run.stages.iter_mut().find(|s| s.id == stage_id))
            .ok_or_else(|| TrackerError::UnknownStage(stage_id.to_string()))
    }
}
