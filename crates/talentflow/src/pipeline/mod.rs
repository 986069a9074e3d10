pub mod orchestrator;
pub mod preview;
pub mod progress;
pub mod runner;
pub mod stage;
pub mod tracker;

pub use orchestrator::{
    NoopSink, PipelineOrchestrator, PipelineOutcome, ResultSink, RunFailure, RunSummary,
};
pub use preview::AnalysisPreview;
pub use progress::{BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{CancelToken, NoopStageProgress, StageOutcome, StageProgress, StageRunner};
pub use stage::{Stage, StageDefinition, StagePayload, StageStatus};
pub use tracker::{PipelineRun, RunStatus, StageTracker};
