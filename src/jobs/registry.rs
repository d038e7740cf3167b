use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use parking_lot::RwLock;

use crate::{
    config::{export::ExportConfig, meeting::MeetingConfig, speaker::SpeakerConfig},
    encode::select::{EncoderProbe, FfmpegProbe},
    export::pipeline::{ExportRequest, run_export},
    foundation::error::{ComposerError, ComposerResult},
    jobs::job::{JobId, JobRecord, JobSnapshot},
};

const WAIT_POLL: Duration = Duration::from_millis(50);

/// Owns every export job of the process and runs each on its own worker thread.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Arc<JobRecord>>>,
    probe: Arc<dyn EncoderProbe>,
    scratch_base: Option<PathBuf>,
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("jobs", &self.jobs.read().len())
            .field("scratch_base", &self.scratch_base)
            .finish()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    /// Registry probing hardware encoders with the system `ffmpeg` and keeping scratch data in
    /// the system temp directory.
    pub fn new() -> Self {
        Self::with_probe(Arc::new(FfmpegProbe::new()))
    }

    pub fn with_probe(probe: Arc<dyn EncoderProbe>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            probe,
            scratch_base: None,
        }
    }

    /// Create job scratch directories under `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_base = Some(dir.into());
        self
    }

    /// Validate the configuration and start an export in the background.
    ///
    /// Configuration errors are returned here, before any job exists.
    pub fn start(
        &self,
        export: ExportConfig,
        meeting: MeetingConfig,
        speaker: SpeakerConfig,
    ) -> ComposerResult<JobId> {
        let request = ExportRequest {
            meeting,
            speaker,
            export,
        };
        request.validate()?;

        let probe = Arc::clone(&self.probe);
        self.spawn_job(move |record, scratch| {
            run_export(&request, scratch, probe.as_ref(), record).map(|outcome| outcome.artifact)
        })
    }

    /// Register a queued job and run `work` for it on a named worker thread.
    pub(crate) fn spawn_job<F>(&self, work: F) -> ComposerResult<JobId>
    where
        F: FnOnce(&JobRecord, &Path) -> ComposerResult<PathBuf> + Send + 'static,
    {
        let scratch = self.make_scratch()?;
        let scratch_path = scratch.path().to_path_buf();
        let id = JobId::new();
        let record = Arc::new(JobRecord::new(id, scratch));
        self.jobs.write().insert(id, Arc::clone(&record));

        let worker_record = Arc::clone(&record);
        let spawned = std::thread::Builder::new()
            .name(format!("export-{}", &id.to_string()[..8]))
            .spawn(move || run_worker(&worker_record, &scratch_path, work));
        if let Err(e) = spawned {
            self.jobs.write().remove(&id);
            return Err(ComposerError::Other(
                anyhow::Error::new(e).context("failed to spawn export worker thread"),
            ));
        }

        tracing::info!(job = %id, "job queued");
        Ok(id)
    }

    fn make_scratch(&self) -> ComposerResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("meeting-composer-");
        let dir = match &self.scratch_base {
            Some(base) => {
                std::fs::create_dir_all(base).with_context(|| {
                    format!("failed to create scratch base '{}'", base.display())
                })?;
                builder.tempdir_in(base)
            }
            None => builder.tempdir(),
        }
        .context("failed to create job scratch directory")?;
        Ok(dir)
    }

    fn record(&self, id: JobId) -> ComposerResult<Arc<JobRecord>> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| ComposerError::not_found(id.to_string()))
    }

    /// Non-blocking status read.
    pub fn status(&self, id: JobId) -> ComposerResult<JobSnapshot> {
        Ok(self.record(id)?.snapshot())
    }

    /// Path of the finished output; [`ComposerError::NotReady`] unless the job is `done`.
    pub fn artifact(&self, id: JobId) -> ComposerResult<PathBuf> {
        let record = self.record(id)?;
        record.artifact().ok_or_else(|| {
            ComposerError::not_ready(format!("{id} is {:?}", record.snapshot().status))
        })
    }

    /// Ask a job to stop; it fails with "export cancelled" at its next checkpoint.
    pub fn cancel(&self, id: JobId) -> ComposerResult<()> {
        self.record(id)?.request_cancel();
        tracing::info!(job = %id, "cancel requested");
        Ok(())
    }

    /// Forget a job. A running job is cancelled first; its scratch directory goes away once the
    /// worker lets go of the record.
    pub fn remove(&self, id: JobId) -> ComposerResult<()> {
        let record = self
            .jobs
            .write()
            .remove(&id)
            .ok_or_else(|| ComposerError::not_found(id.to_string()))?;
        if !record.snapshot().status.is_terminal() {
            record.request_cancel();
        }
        Ok(())
    }

    /// Drop terminal jobs that finished more than `max_age` ago. Returns how many were removed.
    pub fn prune(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, r| match r.finished_at() {
            Some(t) => now.duration_since(t) <= max_age,
            None => true,
        });
        let removed = before - jobs.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned finished jobs");
        }
        removed
    }

    /// Poll until the job reaches a terminal state or `timeout` elapses; returns the last
    /// snapshot either way.
    pub fn wait(&self, id: JobId, timeout: Duration) -> ComposerResult<JobSnapshot> {
        let record = self.record(id)?;
        let deadline = Instant::now() + timeout;
        loop {
            let snap = record.snapshot();
            if snap.status.is_terminal() || Instant::now() >= deadline {
                return Ok(snap);
            }
            std::thread::sleep(WAIT_POLL);
        }
    }

    /// All jobs, oldest first.
    pub fn list(&self) -> Vec<(JobId, JobSnapshot)> {
        let mut records: Vec<Arc<JobRecord>> = self.jobs.read().values().cloned().collect();
        records.sort_by_key(|r| r.created_at());
        records.iter().map(|r| (r.id(), r.snapshot())).collect()
    }
}

fn run_worker<F>(record: &JobRecord, scratch: &Path, work: F)
where
    F: FnOnce(&JobRecord, &Path) -> ComposerResult<PathBuf>,
{
    record.mark_running();
    tracing::debug!(job = %record.id(), "job running");

    match catch_unwind(AssertUnwindSafe(|| work(record, scratch))) {
        Ok(Ok(artifact)) => {
            tracing::info!(job = %record.id(), artifact = %artifact.display(), "job done");
            record.mark_done(artifact);
        }
        Ok(Err(e)) => {
            let msg = format!("{e:#}");
            tracing::warn!(job = %record.id(), error = %msg, "job failed");
            record.mark_failed(msg);
        }
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            tracing::error!(job = %record.id(), panic = %msg, "export worker panicked");
            record.mark_failed(format!("export worker panicked: {msg}"));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/registry.rs"]
mod tests;
