//! Source probing, streaming frame decode and letterbox scaling.

pub mod letterbox;
pub mod probe;
pub mod reader;

pub use letterbox::{letterbox, stretch};
pub use probe::{MediaInfo, probe};
pub use reader::{FrameSource, MediaReader, VideoMetadata, load_background};
