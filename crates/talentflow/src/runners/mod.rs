//! Concrete stage runners. Production hosts supply their own implementations
//! of the `StageRunner` contract; the simulated runners here stand in for
//! external services in demos and tests.

pub mod simulated;

use std::time::Duration;

use crate::pipeline::preview::AnalysisPreview;
use crate::pipeline::runner::StageRunner;
use crate::pipeline::stage::{StageDefinition, StagePayload};

pub use simulated::SimulatedRunner;

/// The five standard resume-processing stages with simulated timings:
/// upload (chunked 0-100%), extraction, analysis (emits the preview),
/// matching, result generation.
pub fn standard_runners() -> Vec<Box<dyn StageRunner>> {
    vec![
        Box::new(
            SimulatedRunner::new(
                StageDefinition::new("upload", "File Upload", "Uploading your resume file..."),
                Duration::from_millis(1000),
            )
            .with_ticks(10),
        ),
        Box::new(SimulatedRunner::new(
            StageDefinition::new(
                "extract",
                "AI Content Parsing",
                "Extracting key information from resume...",
            ),
            Duration::from_millis(1500),
        )),
        Box::new(
            SimulatedRunner::new(
                StageDefinition::new(
                    "analyze",
                    "Skills Analysis",
                    "Analyzing your professional skills and experience...",
                ),
                Duration::from_millis(2000),
            )
            .with_payload(StagePayload::Preview(sample_preview())),
        ),
        Box::new(SimulatedRunner::new(
            StageDefinition::new(
                "match",
                "Job Matching",
                "Finding the best job opportunities...",
            ),
            Duration::from_millis(1800),
        )),
        Box::new(SimulatedRunner::new(
            StageDefinition::new(
                "results",
                "Generate Results",
                "Preparing personalized job recommendations...",
            ),
            Duration::from_millis(1000),
        )),
    ]
}

/// Preview emitted by the simulated analysis stage.
pub fn sample_preview() -> AnalysisPreview {
    AnalysisPreview {
        skills: vec![
            "JavaScript".to_string(),
            "React".to_string(),
            "Node.js".to_string(),
            "Python".to_string(),
        ],
        experience: "2-3 years".to_string(),
        education: "Bachelor's degree".to_string(),
        matching_jobs: 8,
    }
}
