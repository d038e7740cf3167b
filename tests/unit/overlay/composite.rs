use super::*;
use proptest::prelude::*;

#[test]
fn opaque_overlay_replaces_in_bgr_order() {
    let mut base = BgrFrame::black(4, 4);
    let red = RgbaRaster::filled(2, 2, [255, 0, 0, 255]);
    composite(&mut base, &red, 1, 1);
    assert_eq!(base.pixel(1, 1), [0, 0, 255]);
    assert_eq!(base.pixel(2, 2), [0, 0, 255]);
    assert_eq!(base.pixel(0, 0), [0, 0, 0]);
    assert_eq!(base.pixel(3, 3), [0, 0, 0]);
}

#[test]
fn half_alpha_blends() {
    let mut base = BgrFrame::filled(1, 1, [0, 0, 0]);
    let white = RgbaRaster::filled(1, 1, [255, 255, 255, 128]);
    composite(&mut base, &white, 0, 0);
    assert_eq!(base.pixel(0, 0), [128, 128, 128]);
}

#[test]
fn out_of_bounds_is_clipped() {
    let mut base = BgrFrame::black(4, 4);
    let green = RgbaRaster::filled(3, 3, [0, 255, 0, 255]);
    composite(&mut base, &green, -2, 2);
    assert_eq!(base.pixel(0, 2), [0, 255, 0]);
    assert_eq!(base.pixel(0, 3), [0, 255, 0]);
    assert_eq!(base.pixel(1, 2), [0, 0, 0]);

    let before = base.clone();
    composite(&mut base, &green, 10, 10);
    composite(&mut base, &green, -3, 0);
    assert_eq!(base, before);
}

#[test]
fn blit_copies_with_clipping() {
    let mut base = BgrFrame::black(4, 3);
    let src = BgrFrame::filled(3, 3, [1, 2, 3]);
    blit(&mut base, &src, 2, -1);
    assert_eq!(base.pixel(2, 0), [1, 2, 3]);
    assert_eq!(base.pixel(3, 1), [1, 2, 3]);
    assert_eq!(base.pixel(2, 2), [0, 0, 0]);
    assert_eq!(base.pixel(1, 0), [0, 0, 0]);
}

proptest! {
    #[test]
    fn transparent_overlay_is_a_no_op(
        seed in any::<u8>(), w in 1u32..8, h in 1u32..8, x in -10i64..10, y in -10i64..10
    ) {
        let mut base = BgrFrame::filled(6, 5, [seed, seed / 2, 255 - seed]);
        let before = base.clone();
        let clear = RgbaRaster::filled(w, h, [seed, 1, 2, 0]);
        composite(&mut base, &clear, x, y);
        prop_assert_eq!(base, before);
    }

    #[test]
    fn opaque_overlay_replaces_every_covered_pixel(
        rgb in any::<[u8; 3]>(), x in -4i64..6, y in -4i64..5
    ) {
        let mut base = BgrFrame::filled(6, 5, [7, 7, 7]);
        let ov = RgbaRaster::filled(4, 4, [rgb[0], rgb[1], rgb[2], 255]);
        composite(&mut base, &ov, x, y);
        for py in 0..5i64 {
            for px in 0..6i64 {
                let inside = px >= x && px < x + 4 && py >= y && py < y + 4;
                let expected = if inside { [rgb[2], rgb[1], rgb[0]] } else { [7, 7, 7] };
                prop_assert_eq!(base.pixel(px as u32, py as u32), expected);
            }
        }
    }
}
