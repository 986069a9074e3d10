use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::input::CandidateInput;

use super::stage::{StageDefinition, StagePayload};

/// Terminal outcome of a single stage runner. Every `start` call produces
/// exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Success { payload: Option<StagePayload> },
    Failure { reason: String },
}

impl StageOutcome {
    pub fn success() -> Self {
        StageOutcome::Success { payload: None }
    }

    pub fn success_with(payload: StagePayload) -> Self {
        StageOutcome::Success {
            payload: Some(payload),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        StageOutcome::Failure {
            reason: reason.into(),
        }
    }
}

/// Sink a runner reports incremental progress into while it works.
pub trait StageProgress: Send + Sync {
    /// Reports percent complete. Values above 100 are clamped downstream.
    fn progress(&self, percent: u8);
}

/// No-op sink for runners under unit test.
pub struct NoopStageProgress;

impl StageProgress for NoopStageProgress {
    fn progress(&self, _percent: u8) {}
}

/// Cooperative cancellation flag shared between the caller and a run.
/// Runners should check it between units of work; runners that cannot are
/// fire-and-forget and have their late reports discarded by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// The executable unit performing one stage's work. How a runner computes
/// progress (chunked transfer, service polling, fixed-delay simulation) is
/// its own business; the core depends only on this event contract.
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Identity and presentation text for the stage this runner drives.
    fn definition(&self) -> StageDefinition;

    /// Performs the stage's work, reporting zero or more progress values
    /// before returning exactly one terminal outcome.
    async fn start(
        &self,
        input: &CandidateInput,
        progress: &dyn StageProgress,
        cancel: &CancelToken,
    ) -> StageOutcome;
}
