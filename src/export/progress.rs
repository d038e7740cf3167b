use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Progress reached when every frame has been written.
pub const VIDEO_PHASE_END: u8 = 90;
/// Progress reached once the mixed audio is on disk.
pub const AUDIO_PHASE_END: u8 = 95;
/// Progress reached once the final file is muxed.
pub const MUX_PHASE_END: u8 = 99;
pub const COMPLETE: u8 = 100;

/// Progress after `written` of `total` frames: scaled into the video phase and kept strictly
/// below [`VIDEO_PHASE_END`] until the phase is over.
pub fn video_progress(written: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = u128::from(written) * u128::from(VIDEO_PHASE_END) / u128::from(total);
    pct.min(u128::from(VIDEO_PHASE_END - 1)) as u8
}

/// Hooks through which a running export reports progress and learns about cancellation.
pub trait ExportControl: Sync {
    fn is_cancelled(&self) -> bool;
    fn report(&self, progress: u8);
}

/// Records the highest reported progress and exposes a cancel flag. Useful for synchronous
/// callers and tests.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    progress: AtomicU8,
    cancelled: AtomicBool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl ExportControl for ProgressTracker {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn report(&self, progress: u8) {
        self.progress
            .fetch_max(progress.min(COMPLETE), Ordering::AcqRel);
    }
}
