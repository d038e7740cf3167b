#![forbid(unsafe_code)]
//! Two-speaker meeting video composer.
//!
//! A meeting is one static background plus two speaker recordings. Every output frame is the
//! stretched background with each speaker letterboxed into a fixed window and a name plate
//! under it. Frames are composed on the CPU and streamed to `ffmpeg`; the two audio tracks are
//! mixed to mono and muxed in. Exports run as background jobs owned by a [`JobRegistry`].
//!
//! `ffmpeg` and `ffprobe` must be on `PATH` for decoding and encoding.

pub mod audio;
pub mod compose;
pub mod config;
pub mod encode;
pub mod export;
pub mod foundation;
pub mod jobs;
pub mod media;
pub mod overlay;

pub use compose::{FrameCompositor, PreviewImage, create_preview};
pub use config::{ExportConfig, FontSize, JobSpec, MeetingConfig, Rgb8, Rgba8, SpeakerConfig};
pub use encode::{EncoderKind, EncoderProbe, EncoderSpec, FfmpegProbe};
pub use export::{ExportControl, ExportOutcome, ExportRequest, ProgressTracker, run_export};
pub use foundation::core::{BgrFrame, Canvas, Rect, RgbaRaster};
pub use foundation::error::{ComposerError, ComposerResult};
pub use jobs::{JobId, JobRegistry, JobSnapshot, JobStatus};
pub use media::{MediaReader, VideoMetadata};
