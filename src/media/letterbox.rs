use image::{ImageBuffer, Rgb, imageops};

use crate::foundation::{
    core::BgrFrame,
    error::{ComposerError, ComposerResult},
};

/// Size of `src` scaled to fit inside `target` with its aspect ratio kept. Never exceeds the
/// target box and never collapses a side to zero.
pub fn fit_within(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = src;
    let (tw, th) = target;
    if sw == 0 || sh == 0 || tw == 0 || th == 0 {
        return (0, 0);
    }
    let scale = (f64::from(tw) / f64::from(sw)).min(f64::from(th) / f64::from(sh));
    let w = ((f64::from(sw) * scale) as u32).clamp(1, tw);
    let h = ((f64::from(sh) * scale) as u32).clamp(1, th);
    (w, h)
}

fn to_buffer(frame: &BgrFrame) -> ComposerResult<ImageBuffer<Rgb<u8>, &[u8]>> {
    // Channel order is irrelevant to resampling, so BGR bytes travel as `Rgb`.
    ImageBuffer::from_raw(frame.width, frame.height, frame.data.as_slice())
        .ok_or_else(|| ComposerError::media("frame buffer is smaller than its dimensions"))
}

/// Resize to exactly `width` x `height`, ignoring aspect ratio.
pub fn stretch(frame: &BgrFrame, width: u32, height: u32) -> ComposerResult<BgrFrame> {
    if width == 0 || height == 0 {
        return Err(ComposerError::config(format!(
            "cannot resize to an empty {width}x{height} frame"
        )));
    }
    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }
    let src = to_buffer(frame)?;
    let out = imageops::resize(&src, width, height, imageops::FilterType::Lanczos3);
    BgrFrame::from_raw(width, height, out.into_raw())
}

/// Scale `frame` to fit the target box, center it and pad the rest with black.
pub fn letterbox(frame: &BgrFrame, target_w: u32, target_h: u32) -> ComposerResult<BgrFrame> {
    if target_w == 0 || target_h == 0 {
        return Err(ComposerError::config(format!(
            "letterbox target must be non-empty, got {target_w}x{target_h}"
        )));
    }
    let (w, h) = fit_within((frame.width, frame.height), (target_w, target_h));
    if (w, h) == (target_w, target_h) {
        return stretch(frame, w, h);
    }
    if w == 0 || h == 0 {
        return Ok(BgrFrame::black(target_w, target_h));
    }

    let scaled = stretch(frame, w, h)?;
    let mut out = BgrFrame::black(target_w, target_h);
    let x0 = ((target_w - w) / 2) as usize;
    let y0 = ((target_h - h) / 2) as usize;
    let src_stride = scaled.stride();
    let dst_stride = out.stride();
    for row in 0..h as usize {
        let src = &scaled.data[row * src_stride..(row + 1) * src_stride];
        let start = (y0 + row) * dst_stride + x0 * BgrFrame::CHANNELS;
        out.data[start..start + src_stride].copy_from_slice(src);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/media/letterbox.rs"]
mod tests;
