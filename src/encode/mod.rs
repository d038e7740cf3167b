//! Encoder selection and the ffmpeg-backed encode stages.

pub mod ffmpeg;
pub mod mux;
pub mod select;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use mux::mux;
pub use select::{EncoderKind, EncoderProbe, EncoderSpec, FfmpegProbe, select};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
