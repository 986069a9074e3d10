pub mod broadcast;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod runners;
pub mod validate;

pub use broadcast::{RunProgressBroadcaster, RunProgressEvent, RunProgressTracker, RunState};
pub use error::{PipelineError, Result, TrackerError, ValidationError};
pub use input::{format_file_size, CandidateInput};
pub use pipeline::{
    AnalysisPreview, PipelineOrchestrator, PipelineOutcome, PipelineRun, ResultSink, RunFailure,
    RunStatus, RunSummary, Stage, StageDefinition, StageOutcome, StagePayload, StageRunner,
    StageStatus, StageTracker,
};
pub use runners::{standard_runners, SimulatedRunner};
pub use validate::{validate, ValidationPolicy};
