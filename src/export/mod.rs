//! The export state machine: compose every frame, mix audio, mux, deliver.

pub mod pipeline;
pub mod progress;

pub use pipeline::{ExportOutcome, ExportRequest, run_export};
pub use progress::{ExportControl, ProgressTracker};
