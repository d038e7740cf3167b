use crate::foundation::{
    core::BgrFrame,
    error::{ComposerError, ComposerResult},
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
}

/// Sink contract for consuming composed frames in output order.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ComposerResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: u64, frame: &BgrFrame) -> ComposerResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ComposerResult<()>;
}

/// Collects frames in memory. Holds sinks to the same contract as the encoder: indices must run
/// 0, 1, 2, ... and, once configured, every frame must match the configured size.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, BgrFrame)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u64, BgrFrame)] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ComposerResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &BgrFrame) -> ComposerResult<()> {
        let expected = self.frames.len() as u64;
        if idx != expected {
            return Err(ComposerError::encoding(format!(
                "frame {idx} pushed out of order (expected {expected})"
            )));
        }
        if let Some(cfg) = self.cfg
            && (frame.width, frame.height) != (cfg.width, cfg.height)
        {
            return Err(ComposerError::encoding(format!(
                "frame {idx} is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ComposerResult<()> {
        self.ended = true;
        Ok(())
    }
}
