use std::path::Path;

use crate::{
    config::{
        color::{Rgb8, Rgba8},
        speaker::{FontSize, SpeakerConfig},
    },
    foundation::{
        core::RgbaRaster,
        error::{ComposerError, ComposerResult},
        math::unpremultiply,
    },
    overlay::text::{TextBrush, TextLayoutEngine, find_font},
};

/// Plates are never shorter than this.
pub const MIN_PLATE_HEIGHT: u32 = 50;
/// Smallest size tried when fitting text automatically.
pub const MIN_AUTO_FONT_PX: u32 = 8;

/// Name-plate styling, shared by both speakers.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateStyle {
    pub font_size: FontSize,
    pub text: Rgb8,
    pub background: Rgba8,
    pub border: Rgb8,
    pub border_width: u32,
    pub padding: u32,
}

impl From<&SpeakerConfig> for PlateStyle {
    fn from(s: &SpeakerConfig) -> Self {
        Self {
            font_size: s.font_size,
            text: s.font_color,
            background: s.plate_bg_color,
            border: s.plate_border_color,
            border_width: s.plate_border_width,
            padding: s.plate_padding,
        }
    }
}

impl PlateStyle {
    /// Horizontal space taken by padding and border on both sides.
    pub fn inset(&self) -> u32 {
        2 * (self.padding + self.border_width)
    }
}

/// Size of the box a plate belongs to: its width is the plate's minimum width and its height
/// drives the automatic font size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlateBox {
    pub width: u32,
    pub height: u32,
}

/// Largest automatic font size for a window of `box_height` px.
pub fn auto_font_start(box_height: u32) -> u32 {
    let h = f64::from(box_height);
    let min = 12u32.max((h * 0.04) as u32);
    (min + 1).max((h * 0.15) as u32)
}

/// Renders name-plates with one font face.
#[derive(Debug)]
pub struct PlateRenderer {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

impl PlateRenderer {
    /// Load the configured font, or discover a system one.
    pub fn new(font_path: Option<&Path>) -> ComposerResult<Self> {
        let path = find_font(font_path)?;
        tracing::debug!(font = %path.display(), "loading plate font");
        Self::from_engine(TextLayoutEngine::from_path(&path)?)
    }

    pub fn from_font_bytes(bytes: Vec<u8>) -> ComposerResult<Self> {
        Self::from_engine(TextLayoutEngine::new(bytes)?)
    }

    fn from_engine(engine: TextLayoutEngine) -> ComposerResult<Self> {
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(engine.font_bytes().as_ref().clone()),
            0,
        );
        Ok(Self { engine, font })
    }

    pub fn family_name(&self) -> &str {
        self.engine.family_name()
    }

    /// Pick the font size for `name`. Automatic sizing shrinks until the text fits the box width
    /// minus padding and border; text is never truncated.
    pub fn resolve_font_size(
        &mut self,
        name: &str,
        style: &PlateStyle,
        max_box: PlateBox,
    ) -> ComposerResult<u32> {
        match style.font_size {
            FontSize::Fixed(px) => Ok(px),
            FontSize::Auto => {
                let available = max_box.width.saturating_sub(style.inset()) as f32;
                let start = auto_font_start(max_box.height);
                for px in (MIN_AUTO_FONT_PX..=start).rev() {
                    let (w, _) = self.engine.measure(name, px as f32)?;
                    if w <= available {
                        return Ok(px);
                    }
                }
                Err(ComposerError::config(format!(
                    "display name '{name}' does not fit a {}px wide plate even at {MIN_AUTO_FONT_PX}px",
                    max_box.width
                )))
            }
        }
    }

    /// Rasterize a plate for `name` as straight-alpha RGBA.
    #[tracing::instrument(level = "debug", skip(self, style))]
    pub fn render_plate(
        &mut self,
        name: &str,
        style: &PlateStyle,
        max_box: PlateBox,
    ) -> ComposerResult<RgbaRaster> {
        let size_px = self.resolve_font_size(name, style, max_box)?;
        let [r, g, b] = style.text.0;
        let layout = self.engine.layout_line(
            name,
            size_px as f32,
            TextBrush { r, g, b, a: 255 },
        )?;
        let text_w = layout.width().ceil().max(0.0) as u32;
        let text_h = layout.height().ceil().max(0.0) as u32;

        let width = (text_w + style.inset()).max(max_box.width).max(1);
        let height = (text_h + style.inset()).max(MIN_PLATE_HEIGHT);
        let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(ComposerError::config(format!(
                    "plate for '{name}' would be {width}x{height}, too large to rasterize"
                )));
            }
        };

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        let (wf, hf) = (f64::from(width), f64::from(height));

        let [br, bg, bb, ba] = style.background.0;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(br, bg, bb, ba));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, wf, hf));

        if style.border_width > 0 {
            let bw = f64::from(style.border_width).min(wf / 2.0).min(hf / 2.0);
            let [cr, cg, cb] = style.border.0;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(cr, cg, cb, 255));
            for edge in [
                vello_cpu::kurbo::Rect::new(0.0, 0.0, wf, bw),
                vello_cpu::kurbo::Rect::new(0.0, hf - bw, wf, hf),
                vello_cpu::kurbo::Rect::new(0.0, bw, bw, hf - bw),
                vello_cpu::kurbo::Rect::new(wf - bw, bw, wf, hf - bw),
            ] {
                ctx.fill_rect(&edge);
            }
        }

        let text_x = (f64::from(width) - f64::from(layout.width())) / 2.0;
        let text_y = (f64::from(height) - f64::from(layout.height())) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            text_x.round(),
            text_y.round(),
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        for px in data.chunks_exact_mut(4) {
            let straight = unpremultiply([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&straight);
        }
        RgbaRaster::from_raw(width, height, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/plate.rs"]
mod tests;
