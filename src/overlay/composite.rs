use crate::foundation::{
    core::{BgrFrame, RgbaRaster},
    math::blend_channel,
};

/// Overlap of a `w` x `h` source placed at (`x`, `y`) with a `base_w` x `base_h` target.
/// Returns `(src_x0, src_y0, dst_x0, dst_y0, width, height)`, or `None` when disjoint.
fn clip(
    base_w: u32,
    base_h: u32,
    w: u32,
    h: u32,
    x: i64,
    y: i64,
) -> Option<(usize, usize, usize, usize, usize, usize)> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(w)).min(i64::from(base_w));
    let y1 = (y + i64::from(h)).min(i64::from(base_h));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((
        (x0 - x) as usize,
        (y0 - y) as usize,
        x0 as usize,
        y0 as usize,
        (x1 - x0) as usize,
        (y1 - y0) as usize,
    ))
}

/// Alpha-blend a straight-alpha RGBA overlay onto a BGR frame at a signed offset.
///
/// Pixels falling outside `base` are dropped. Opaque pixels replace, transparent ones are skipped.
pub fn composite(base: &mut BgrFrame, overlay: &RgbaRaster, x: i64, y: i64) {
    let Some((sx, sy, dx, dy, w, h)) =
        clip(base.width, base.height, overlay.width, overlay.height, x, y)
    else {
        return;
    };
    let src_stride = overlay.width as usize * 4;
    let dst_stride = base.stride();

    for row in 0..h {
        let src_row = &overlay.data[(sy + row) * src_stride + sx * 4..][..w * 4];
        let dst_row = &mut base.data[(dy + row) * dst_stride + dx * 3..][..w * 3];
        for (s, d) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(3)) {
            let a = s[3];
            match a {
                0 => {}
                255 => {
                    d[0] = s[2];
                    d[1] = s[1];
                    d[2] = s[0];
                }
                _ => {
                    d[0] = blend_channel(s[2], d[0], a);
                    d[1] = blend_channel(s[1], d[1], a);
                    d[2] = blend_channel(s[0], d[2], a);
                }
            }
        }
    }
}

/// Opaque copy of `src` into `base` at a signed offset, clipped like [`composite`].
pub fn blit(base: &mut BgrFrame, src: &BgrFrame, x: i64, y: i64) {
    let Some((sx, sy, dx, dy, w, h)) = clip(base.width, base.height, src.width, src.height, x, y)
    else {
        return;
    };
    let src_stride = src.stride();
    let dst_stride = base.stride();
    for row in 0..h {
        let s = &src.data[(sy + row) * src_stride + sx * 3..][..w * 3];
        base.data[(dy + row) * dst_stride + dx * 3..][..w * 3].copy_from_slice(s);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/composite.rs"]
mod tests;
