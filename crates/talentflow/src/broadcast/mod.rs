//! Broadcasting module for real-time event streaming.
//!
//! Hosts (desktop shells, SSE endpoints, test harnesses) subscribe here to
//! observe a run without polling tracker snapshots.

pub mod run_progress;

pub use run_progress::{RunProgressBroadcaster, RunProgressEvent, RunProgressTracker, RunState};
