use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use uuid::Uuid;

use crate::export::progress::{COMPLETE, ExportControl};

/// Opaque job identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// Point-in-time view of a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// 0..=100, never decreasing; 100 only once `done`.
    pub progress: u8,
    /// Set only in the `error` state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            progress: 0,
            error: None,
        }
    }
}

#[derive(Debug)]
struct JobState {
    snapshot: JobSnapshot,
    artifact: Option<PathBuf>,
    finished_at: Option<Instant>,
}

/// Shared record of one job. Only the worker thread mutates the snapshot.
#[derive(Debug)]
pub struct JobRecord {
    id: JobId,
    state: RwLock<JobState>,
    cancel: AtomicBool,
    scratch: Mutex<Option<TempDir>>,
    created_at: Instant,
}

impl JobRecord {
    pub(crate) fn new(id: JobId, scratch: TempDir) -> Self {
        Self {
            id,
            state: RwLock::new(JobState {
                snapshot: JobSnapshot::queued(),
                artifact: None,
                finished_at: None,
            }),
            cancel: AtomicBool::new(false),
            scratch: Mutex::new(Some(scratch)),
            created_at: Instant::now(),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Artifact path once the job is `done`.
    pub fn artifact(&self) -> Option<PathBuf> {
        let state = self.state.read();
        match state.snapshot.status {
            JobStatus::Done => state.artifact.clone(),
            _ => None,
        }
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.state.read().finished_at
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub(crate) fn mark_running(&self) {
        let mut state = self.state.write();
        if state.snapshot.status == JobStatus::Queued {
            state.snapshot.status = JobStatus::Running;
        }
    }

    pub(crate) fn mark_done(&self, artifact: PathBuf) {
        let mut state = self.state.write();
        if state.snapshot.status.is_terminal() {
            return;
        }
        state.artifact = Some(artifact);
        state.finished_at = Some(Instant::now());
        state.snapshot = JobSnapshot {
            status: JobStatus::Done,
            progress: COMPLETE,
            error: None,
        };
    }

    /// Enter the `error` state and discard the scratch directory.
    pub(crate) fn mark_failed(&self, message: String) {
        let mut state = self.state.write();
        if state.snapshot.status.is_terminal() {
            return;
        }
        // Scratch goes before the error is published.
        drop(self.scratch.lock().take());
        let progress = state.snapshot.progress;
        state.finished_at = Some(Instant::now());
        state.snapshot = JobSnapshot {
            status: JobStatus::Error,
            progress,
            error: Some(message),
        };
    }
}

impl ExportControl for JobRecord {
    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn report(&self, progress: u8) {
        let mut state = self.state.write();
        if state.snapshot.status != JobStatus::Running {
            return;
        }
        let progress = progress.min(COMPLETE - 1);
        if progress > state.snapshot.progress {
            state.snapshot.progress = progress;
        }
    }
}
