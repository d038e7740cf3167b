use super::*;
use crate::{
    compose::layout::Layout,
    encode::sink::InMemorySink,
    export::progress::{ProgressTracker, VIDEO_PHASE_END},
    foundation::core::{BgrFrame, Canvas, Rect, RgbaRaster},
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

struct VecSource(VecDeque<BgrFrame>);

impl VecSource {
    fn solid(n: usize, bgr: [u8; 3]) -> Self {
        Self((0..n).map(|_| BgrFrame::filled(8, 6, bgr)).collect())
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> ComposerResult<Option<BgrFrame>> {
        Ok(self.0.pop_front())
    }
}

fn compositor() -> FrameCompositor {
    let layout = Layout {
        canvas: Canvas::new(40, 20),
        speakers: [Rect::new(2, 4, 16, 12), Rect::new(22, 4, 16, 12)],
    };
    let clear = RgbaRaster::filled(16, 2, [0, 0, 0, 0]);
    FrameCompositor::new(&BgrFrame::black(40, 20), [clear.clone(), clear], layout).unwrap()
}

#[test]
fn shorter_source_bounds_the_output() {
    let mut a = VecSource::solid(5, [255, 0, 0]);
    let mut b = VecSource::solid(3, [0, 255, 0]);
    let mut sink = InMemorySink::new();
    let control = ProgressTracker::new();
    let n = render_frames(&mut a, &mut b, &compositor(), &mut sink, 3, &control).unwrap();

    assert_eq!(n, 3);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    let (_, first) = &sink.frames()[0];
    assert_eq!(first.pixel(10, 10), [255, 0, 0]);
    assert_eq!(first.pixel(30, 10), [0, 255, 0]);
    assert!(control.progress() < VIDEO_PHASE_END);
    assert_eq!(control.progress(), VIDEO_PHASE_END - 1);
}

#[test]
fn cancellation_stops_between_frames() {
    struct CancelAfter {
        seen: AtomicUsize,
        limit: usize,
    }
    impl ExportControl for CancelAfter {
        fn is_cancelled(&self) -> bool {
            self.seen.load(Ordering::SeqCst) >= self.limit
        }
        fn report(&self, _progress: u8) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mut a = VecSource::solid(10, [1, 1, 1]);
    let mut b = VecSource::solid(10, [2, 2, 2]);
    let mut sink = InMemorySink::new();
    let control = CancelAfter {
        seen: AtomicUsize::new(0),
        limit: 2,
    };
    let err = render_frames(&mut a, &mut b, &compositor(), &mut sink, 10, &control).unwrap_err();
    assert!(matches!(err, ComposerError::Cancelled));
    assert_eq!(sink.frames().len(), 2);
}

#[test]
fn empty_source_yields_zero_frames() {
    let mut a = VecSource::solid(0, [0, 0, 0]);
    let mut b = VecSource::solid(4, [0, 0, 0]);
    let mut sink = InMemorySink::new();
    let n = render_frames(
        &mut a,
        &mut b,
        &compositor(),
        &mut sink,
        0,
        &ProgressTracker::new(),
    )
    .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn expected_frames_prefers_known_counts() {
    assert_eq!(expected_frames(150, 120), 120);
    assert_eq!(expected_frames(0, 120), 120);
    assert_eq!(expected_frames(90, 0), 90);
    assert_eq!(expected_frames(0, 0), 0);
}

#[test]
fn deliver_moves_file() {
    let dir = tempfile::tempdir().unwrap();
    let from = dir.path().join("out.mp4");
    std::fs::write(&from, b"data").unwrap();
    let to = dir.path().join("nested/final.mp4");
    deliver(&from, &to).unwrap();
    assert!(!from.exists());
    assert_eq!(std::fs::read(&to).unwrap(), b"data");
}
