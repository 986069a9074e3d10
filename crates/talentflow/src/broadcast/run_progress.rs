//! Run progress broadcaster for real-time pipeline status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::pipeline::preview::AnalysisPreview;

/// Run-level status carried on every streamed event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Processing,
    Completed,
    Failed,
}

/// Progress event for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgressEvent {
    /// Unique run identifier.
    pub run_id: String,
    /// Display name of the input being processed.
    pub file_name: String,
    /// Stage the event refers to, absent for run-level events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    pub state: RunState,
    /// Human-readable message describing current activity.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Percent complete of the active stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Final preview (set on completion).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<AnalysisPreview>,
    /// Error message (set on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunProgressEvent {
    /// Creates a progress event for an in-flight run.
    pub fn new(run_id: &str, file_name: &str, stage_id: Option<&str>, message: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            file_name: file_name.to_string(),
            stage_id: stage_id.map(|s| s.to_string()),
            state: RunState::Processing,
            message: message.to_string(),
            timestamp: Utc::now(),
            progress: None,
            preview: None,
            error: None,
        }
    }

    /// Creates a completion event carrying the final preview.
    pub fn completed(run_id: &str, file_name: &str, preview: Option<AnalysisPreview>) -> Self {
        Self {
            state: RunState::Completed,
            preview,
            ..Self::new(run_id, file_name, None, "Analysis completed successfully")
        }
    }

    /// Creates a failure event naming the failed stage.
    pub fn failed(run_id: &str, file_name: &str, stage_id: &str, error: &str) -> Self {
        Self {
            state: RunState::Failed,
            error: Some(error.to_string()),
            ..Self::new(run_id, file_name, Some(stage_id), "Processing failed")
        }
    }

    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress = Some(percent.min(100));
        self
    }
}

/// Broadcasts run progress events to any number of subscribers.
#[derive(Clone)]
pub struct RunProgressBroadcaster {
    sender: Arc<broadcast::Sender<RunProgressEvent>>,
}

impl RunProgressBroadcaster {
    /// Creates a broadcaster with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers. No active receivers is fine.
    pub fn send(&self, event: RunProgressEvent) {
        let _ = self.sender.send(event);
    }

    /// Creates a new subscriber for progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<RunProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker scoped to one run.
    pub fn start_run(&self, run_id: &str, file_name: &str) -> RunProgressTracker {
        RunProgressTracker::new(run_id, file_name, Arc::clone(&self.sender))
    }
}

impl Default for RunProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Publishes progress for a single run onto the broadcast channel.
pub struct RunProgressTracker {
    run_id: String,
    file_name: String,
    sender: Arc<broadcast::Sender<RunProgressEvent>>,
}

impl RunProgressTracker {
    pub fn new(
        run_id: &str,
        file_name: &str,
        sender: Arc<broadcast::Sender<RunProgressEvent>>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            file_name: file_name.to_string(),
            sender,
        }
    }

    /// Announces that a stage started processing.
    pub fn stage_started(&self, stage_id: &str, message: &str) {
        let event = RunProgressEvent::new(&self.run_id, &self.file_name, Some(stage_id), message);
        let _ = self.sender.send(event);
    }

    /// Publishes a percent update for the active stage.
    pub fn stage_progress(&self, stage_id: &str, percent: u8) {
        let event = RunProgressEvent::new(&self.run_id, &self.file_name, Some(stage_id), "")
            .with_progress(percent);
        let _ = self.sender.send(event);
    }

    /// Announces that a stage completed.
    pub fn stage_completed(&self, stage_id: &str) {
        let event = RunProgressEvent::new(
            &self.run_id,
            &self.file_name,
            Some(stage_id),
            "Stage completed",
        );
        let _ = self.sender.send(event);
    }

    /// Marks the run as completed with the final preview.
    pub fn completed(&self, preview: Option<AnalysisPreview>) {
        let event = RunProgressEvent::completed(&self.run_id, &self.file_name, preview);
        let _ = self.sender.send(event);
    }

    /// Marks the run as failed at the given stage.
    pub fn failed(&self, stage_id: &str, error: &str) {
        let event = RunProgressEvent::failed(&self.run_id, &self.file_name, stage_id, error);
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(RunProgressEvent::new(
            "run-1",
            "resume.pdf",
            Some("upload"),
            "Uploading",
        ));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.run_id, "run-1");
        assert_eq!(received.stage_id.as_deref(), Some("upload"));
        assert_eq!(received.state, RunState::Processing);
    }

    #[test]
    fn test_tracker_stage_events() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let tracker = broadcaster.start_run("run-2", "resume.docx");

        tracker.stage_started("extract", "Extracting key information...");
        tracker.stage_progress("extract", 40);
        tracker.stage_completed("extract");

        let started = rx.try_recv().unwrap();
        assert_eq!(started.stage_id.as_deref(), Some("extract"));
        assert_eq!(started.progress, None);

        let progressed = rx.try_recv().unwrap();
        assert_eq!(progressed.progress, Some(40));

        let completed = rx.try_recv().unwrap();
        assert_eq!(completed.message, "Stage completed");
    }

    #[test]
    fn test_run_completion_carries_preview() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let tracker = broadcaster.start_run("run-3", "resume.pdf");

        let preview = AnalysisPreview {
            skills: vec!["React".to_string()],
            experience: "2-3 years".to_string(),
            education: "Bachelor's degree".to_string(),
            matching_jobs: 8,
        };
        tracker.completed(Some(preview.clone()));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.state, RunState::Completed);
        assert_eq!(received.preview, Some(preview));
    }

    #[test]
    fn test_run_failure_names_stage() {
        let broadcaster = RunProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let tracker = broadcaster.start_run("run-4", "resume.pdf");

        tracker.failed("extract", "parser service unavailable");

        let received = rx.try_recv().unwrap();
        assert_eq!(received.state, RunState::Failed);
        assert_eq!(received.stage_id.as_deref(), Some("extract"));
        assert_eq!(
            received.error.as_deref(),
            Some("parser service unavailable")
        );
    }

    #[test]
    fn test_progress_clamped_on_event() {
        let event =
            RunProgressEvent::new("r", "f", Some("upload"), "").with_progress(200);
        assert_eq!(event.progress, Some(100));
    }
}
