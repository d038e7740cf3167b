use crate::{
    config::{export::ExportConfig, speaker::SpeakerConfig},
    foundation::core::{Canvas, Rect},
};

/// Vertical gap between a speaker window and its plate.
pub const PLATE_GAP: u32 = 5;

/// Output canvas plus the two speaker windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub canvas: Canvas,
    pub speakers: [Rect; 2],
}

/// Speaker 1 centered in the left half, speaker 2 its mirror image, both vertically centered.
///
/// Assumes a speaker config already validated against `export`.
pub fn layout(export: &ExportConfig, speaker: &SpeakerConfig) -> Layout {
    let canvas = export.canvas();
    let (width, height) = (canvas.width, canvas.height);
    let (w, h) = (speaker.width.min(width / 2), speaker.height.min(height));
    let half = width / 2;
    let x1 = (half - w) / 2;
    let x2 = width - x1 - w;
    let y = (height - h) / 2;
    Layout {
        canvas,
        speakers: [Rect::new(x1, y, w, h), Rect::new(x2, y, w, h)],
    }
}

/// Top-left corner of a `plate_w` x `plate_h` plate for the window `rect`.
///
/// The plate is centered under the window with a [`PLATE_GAP`] gap, or flush with the window's
/// bottom edge when the gapped position would leave the canvas.
pub fn plate_origin(rect: Rect, plate_w: u32, plate_h: u32, canvas: Canvas) -> (i64, i64) {
    let x = i64::from(rect.x) + (i64::from(rect.w) - i64::from(plate_w)) / 2;
    let below = rect.bottom() as i64 + i64::from(PLATE_GAP);
    let y = if below + i64::from(plate_h) <= i64::from(canvas.height) {
        below
    } else {
        rect.bottom() as i64 - i64::from(plate_h)
    };
    (x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
