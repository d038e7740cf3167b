use crate::{
    compose::layout::{Layout, plate_origin},
    config::{meeting::MeetingConfig, speaker::SpeakerConfig},
    foundation::{
        core::{BgrFrame, RgbaRaster},
        error::ComposerResult,
    },
    media::letterbox::{letterbox, stretch},
    overlay::{
        composite::{blit, composite},
        plate::{PlateBox, PlateRenderer, PlateStyle},
    },
};

/// Render both speakers' plates for `layout`.
pub fn render_plates(
    meeting: &MeetingConfig,
    speaker: &SpeakerConfig,
    layout: &Layout,
) -> ComposerResult<[RgbaRaster; 2]> {
    let mut renderer = PlateRenderer::new(speaker.font_path.as_deref())?;
    let style = PlateStyle::from(speaker);
    let [n1, n2] = meeting.names();
    let [r1, r2] = layout.speakers;
    Ok([
        renderer.render_plate(
            n1,
            &style,
            PlateBox {
                width: r1.w,
                height: r1.h,
            },
        )?,
        renderer.render_plate(
            n2,
            &style,
            PlateBox {
                width: r2.w,
                height: r2.h,
            },
        )?,
    ])
}

/// Per-export composition state: the background at output size, both plates and the layout.
#[derive(Clone, Debug)]
pub struct FrameCompositor {
    background: BgrFrame,
    plates: [RgbaRaster; 2],
    layout: Layout,
}

impl FrameCompositor {
    pub fn new(
        background: &BgrFrame,
        plates: [RgbaRaster; 2],
        layout: Layout,
    ) -> ComposerResult<Self> {
        let background = stretch(background, layout.canvas.width, layout.canvas.height)?;
        Ok(Self {
            background,
            plates,
            layout,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Compose one output frame: background, then both speaker windows, then both plates.
    ///
    /// Speaker frames that do not match their window are letterboxed first.
    pub fn compose(&self, s1: &BgrFrame, s2: &BgrFrame) -> ComposerResult<BgrFrame> {
        let mut out = self.background.clone();
        let windows = [s1, s2];

        for (frame, rect) in windows.into_iter().zip(self.layout.speakers) {
            if frame.width == rect.w && frame.height == rect.h {
                blit(&mut out, frame, i64::from(rect.x), i64::from(rect.y));
            } else {
                let boxed = letterbox(frame, rect.w, rect.h)?;
                blit(&mut out, &boxed, i64::from(rect.x), i64::from(rect.y));
            }
        }

        for (plate, rect) in self.plates.iter().zip(self.layout.speakers) {
            let (x, y) = plate_origin(rect, plate.width, plate.height, self.layout.canvas);
            composite(&mut out, plate, x, y);
        }
        Ok(out)
    }
}

/// One-shot composition of a single output frame.
pub fn compose_frame(
    background: &BgrFrame,
    s1: &BgrFrame,
    s2: &BgrFrame,
    plates: &[RgbaRaster; 2],
    layout: &Layout,
) -> ComposerResult<BgrFrame> {
    FrameCompositor::new(background, plates.clone(), *layout)?.compose(s1, s2)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
