use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;

use crate::input::CandidateInput;
use crate::pipeline::runner::{CancelToken, StageOutcome, StageProgress, StageRunner};
use crate::pipeline::stage::{StageDefinition, StagePayload};

/// Stage runner that stands in for a real service call with fixed delays.
/// Useful both as a test double and for demo hosts that have no backend yet.
/// Progress is reported in `ticks` equal steps from 0 to 100, checking the
/// cancellation flag between steps.
pub struct SimulatedRunner {
    def: StageDefinition,
    total_delay: Duration,
    ticks: u32,
    payload: Option<StagePayload>,
    fail_with: Option<String>,
}

impl SimulatedRunner {
    pub fn new(def: StageDefinition, total_delay: Duration) -> Self {
        Self {
            def,
            total_delay,
            ticks: 1,
            payload: None,
            fail_with: None,
        }
    }

    /// Number of progress reports to emit across the total delay.
    ///
    /// # Panics
    /// Panics if `ticks` is 0.
    pub fn with_ticks(mut self, ticks: u32) -> Self {
        assert!(ticks > 0, "ticks must be > 0");
        self.ticks = ticks;
        self
    }

    /// Payload attached to the success outcome.
    pub fn with_payload(mut self, payload: StagePayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Makes the runner fail with the given reason instead of succeeding.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }
}

#[async_trait]
impl StageRunner for SimulatedRunner {
    fn definition(&self) -> StageDefinition {
        self.def.clone()
    }

    async fn start(
        &self,
        input: &CandidateInput,
        progress: &dyn StageProgress,
        cancel: &CancelToken,
    ) -> StageOutcome {
        debug!(stage_id = %self.def.id, file = %input.name, "simulated stage started");

        let step_delay = self.total_delay / self.ticks;
        for tick in 1..=self.ticks {
            if cancel.is_cancelled() {
                // Terminal outcome is still owed; the orchestrator drops it.
                return StageOutcome::failure("cancelled");
            }
            sleep(step_delay).await;
            let percent = ((tick * 100) / self.ticks).min(100) as u8;
            progress.progress(percent);
        }

        match &self.fail_with {
            Some(reason) => StageOutcome::failure(reason.clone()),
            None => StageOutcome::Success {
                payload: self.payload.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::runner::NoopStageProgress;
    use std::sync::Mutex;

    struct RecordingProgress {
        seen: Mutex<Vec<u8>>,
    }

    impl StageProgress for RecordingProgress {
        fn progress(&self, percent: u8) {
            self.seen.lock().unwrap().push(percent);
        }
    }

    fn input() -> CandidateInput {
        CandidateInput::declared("resume.pdf", "application/pdf", 1024)
    }

    fn def() -> StageDefinition {
        StageDefinition::new("upload", "File Upload", "Uploading your resume file...")
    }

    #[tokio::test]
    async fn test_reports_progress_in_equal_steps() {
        let runner = SimulatedRunner::new(def(), Duration::from_millis(10)).with_ticks(10);
        let progress = RecordingProgress {
            seen: Mutex::new(Vec::new()),
        };

        let outcome = runner
            .start(&input(), &progress, &CancelToken::new())
            .await;

        assert_eq!(outcome, StageOutcome::success());
        let seen = progress.seen.lock().unwrap();
        assert_eq!(*seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[tokio::test]
    async fn test_failing_runner_reports_reason() {
        let runner =
            SimulatedRunner::new(def(), Duration::from_millis(1)).failing("storage offline");

        let outcome = runner
            .start(&input(), &NoopStageProgress, &CancelToken::new())
            .await;

        assert_eq!(outcome, StageOutcome::failure("storage offline"));
    }

    #[tokio::test]
    async fn test_cancelled_runner_stops_early() {
        let runner = SimulatedRunner::new(def(), Duration::from_millis(50)).with_ticks(50);
        let cancel = CancelToken::new();
        cancel.cancel();

        let progress = RecordingProgress {
            seen: Mutex::new(Vec::new()),
        };
        let outcome = runner.start(&input(), &progress, &cancel).await;

        assert_eq!(outcome, StageOutcome::failure("cancelled"));
        assert!(progress.seen.lock().unwrap().is_empty());
    }
}
