use super::*;
use proptest::prelude::*;

#[test]
fn wide_source_gets_bars_top_and_bottom() {
    let src = BgrFrame::filled(160, 90, [0, 0, 255]);
    let out = letterbox(&src, 400, 300).unwrap();
    assert_eq!((out.width, out.height), (400, 300));
    // 400x225 content, 37 px bars above.
    assert_eq!(out.pixel(200, 10), [0, 0, 0]);
    assert_eq!(out.pixel(200, 150), [0, 0, 255]);
    assert_eq!(out.pixel(200, 290), [0, 0, 0]);
}

#[test]
fn tall_source_gets_bars_left_and_right() {
    let src = BgrFrame::filled(100, 200, [255, 255, 255]);
    let out = letterbox(&src, 400, 300).unwrap();
    assert_eq!(out.pixel(5, 150), [0, 0, 0]);
    assert_eq!(out.pixel(200, 150), [255, 255, 255]);
    assert_eq!(out.pixel(395, 150), [0, 0, 0]);
}

#[test]
fn matching_aspect_fills_the_box() {
    let src = BgrFrame::filled(640, 480, [9, 8, 7]);
    let out = letterbox(&src, 400, 300).unwrap();
    assert_eq!(out.pixel(0, 0), [9, 8, 7]);
    assert_eq!(out.pixel(399, 299), [9, 8, 7]);
}

#[test]
fn empty_target_is_rejected() {
    let src = BgrFrame::black(4, 4);
    assert!(letterbox(&src, 0, 10).is_err());
    assert!(stretch(&src, 10, 0).is_err());
}

proptest! {
    #[test]
    fn fit_preserves_aspect_and_bounds(
        sw in 1u32..4000, sh in 1u32..4000, tw in 1u32..2000, th in 1u32..2000
    ) {
        let (w, h) = fit_within((sw, sh), (tw, th));
        prop_assert!(w >= 1 && w <= tw);
        prop_assert!(h >= 1 && h <= th);
        // One side touches the box (up to truncation).
        prop_assert!(w + 1 >= tw || h + 1 >= th);
        // Aspect error bounded by one pixel of truncation on either side.
        let lhs = u64::from(w) * u64::from(sh);
        let rhs = u64::from(h) * u64::from(sw);
        let slack = u64::from(sw.max(sh));
        prop_assert!(lhs.abs_diff(rhs) <= slack);
    }
}
