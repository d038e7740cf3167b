//! In-process registry of asynchronous export jobs.

pub mod job;
pub mod registry;

pub use job::{JobId, JobRecord, JobSnapshot, JobStatus};
pub use registry::JobRegistry;
