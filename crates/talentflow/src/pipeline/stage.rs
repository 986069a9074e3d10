use serde::{Deserialize, Serialize};

use super::preview::AnalysisPreview;

/// Status of a single pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Processing => write!(f, "processing"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Error => write!(f, "error"),
        }
    }
}

/// Identity and presentation text for one stage. Titles and descriptions are
/// owned by the host; the core just carries them through to snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Unique, stable identifier (e.g., "upload", "extract").
    pub id: String,
    pub title: String,
    pub description: String,
}

impl StageDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Stage-specific partial result attached on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StagePayload {
    Preview(AnalysisPreview),
    Data(serde_json::Value),
}

impl StagePayload {
    pub fn as_preview(&self) -> Option<&AnalysisPreview> {
        match self {
            StagePayload::Preview(preview) => Some(preview),
            StagePayload::Data(_) => None,
        }
    }
}

/// One unit of the pipeline as observed by a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: StageStatus,
    /// Percent complete, only meaningful while status is `Processing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Partial result attached when the stage completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<StagePayload>,
    /// Failure reason attached when the stage errored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Stage {
    /// Creates a pending stage from its definition.
    pub fn pending(def: &StageDefinition) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            status: StageStatus::Pending,
            progress: None,
            payload: None,
            error: None,
        }
    }
}
