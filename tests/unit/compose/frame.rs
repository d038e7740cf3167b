use super::*;
use crate::foundation::core::{Canvas, Rect};

fn small_layout() -> Layout {
    Layout {
        canvas: Canvas::new(40, 20),
        speakers: [Rect::new(5, 4, 10, 8), Rect::new(25, 4, 10, 8)],
    }
}

#[test]
fn windows_land_on_their_rects() {
    let bg = BgrFrame::filled(40, 20, [50, 50, 50]);
    let s1 = BgrFrame::filled(10, 8, [255, 0, 0]);
    let s2 = BgrFrame::filled(10, 8, [0, 255, 0]);
    let clear = RgbaRaster::filled(10, 2, [0, 0, 0, 0]);
    let out = compose_frame(&bg, &s1, &s2, &[clear.clone(), clear], &small_layout()).unwrap();

    assert_eq!(out.pixel(0, 0), [50, 50, 50]);
    assert_eq!(out.pixel(5, 4), [255, 0, 0]);
    assert_eq!(out.pixel(14, 11), [255, 0, 0]);
    assert_eq!(out.pixel(15, 4), [50, 50, 50]);
    assert_eq!(out.pixel(25, 4), [0, 255, 0]);
    assert_eq!(out.pixel(34, 11), [0, 255, 0]);
}

#[test]
fn background_is_stretched_to_canvas() {
    let bg = BgrFrame::filled(4, 2, [10, 20, 30]);
    let s = BgrFrame::black(10, 8);
    let clear = RgbaRaster::filled(1, 1, [0, 0, 0, 0]);
    let out = compose_frame(&bg, &s, &s, &[clear.clone(), clear], &small_layout()).unwrap();
    assert_eq!((out.width, out.height), (40, 20));
    assert_eq!(out.pixel(39, 19), [10, 20, 30]);
}

#[test]
fn plates_draw_over_windows_below_or_flush() {
    let bg = BgrFrame::black(40, 20);
    let s = BgrFrame::filled(10, 8, [1, 1, 1]);
    // Fits below window (bottom 12 + gap 5 + 2 = 19 <= 20).
    let thin = RgbaRaster::filled(10, 2, [255, 255, 255, 255]);
    // Would overflow; goes flush with the window bottom instead.
    let tall = RgbaRaster::filled(10, 4, [0, 0, 255, 255]);
    let out = compose_frame(&bg, &s, &s, &[thin, tall], &small_layout()).unwrap();

    assert_eq!(out.pixel(5, 17), [255, 255, 255]);
    assert_eq!(out.pixel(5, 16), [0, 0, 0]);
    assert_eq!(out.pixel(25, 8), [255, 0, 0]);
    assert_eq!(out.pixel(25, 11), [255, 0, 0]);
    assert_eq!(out.pixel(25, 7), [1, 1, 1]);
}

#[test]
fn mismatched_speaker_frames_are_letterboxed() {
    let bg = BgrFrame::black(40, 20);
    let wide = BgrFrame::filled(20, 4, [0, 0, 200]);
    let clear = RgbaRaster::filled(1, 1, [0, 0, 0, 0]);
    let out = compose_frame(&bg, &wide, &wide, &[clear.clone(), clear], &small_layout()).unwrap();
    // 10x2 content centered vertically in the 10x8 window at y 4..12.
    assert_eq!(out.pixel(10, 4), [0, 0, 0]);
    assert_eq!(out.pixel(10, 7), [0, 0, 200]);
}
