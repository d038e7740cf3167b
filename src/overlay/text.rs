use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{ComposerError, ComposerResult};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Bold sans-serif faces looked up when no font file is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Resolve the plate font: the explicit path when given, else the first installed candidate.
pub fn find_font(explicit: Option<&Path>) -> ComposerResult<PathBuf> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
        return Err(ComposerError::config(format!(
            "font file '{}' does not exist",
            p.display()
        )));
    }
    FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ComposerError::config(
                "no usable system font found; set speaker.font_path to a .ttf/.otf file",
            )
        })
}

/// Shapes single-line text with one registered font face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font_bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("family_name", &self.family_name)
            .field("font_bytes_len", &self.font_bytes.len())
            .finish()
    }
}

impl TextLayoutEngine {
    /// Register `font_bytes` and resolve its family name.
    pub fn new(font_bytes: Vec<u8>) -> ComposerResult<Self> {
        let font_bytes = Arc::new(font_bytes);
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ComposerError::config("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ComposerError::config("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes,
        })
    }

    pub fn from_path(path: &Path) -> ComposerResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ComposerError::config(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::new(bytes)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn font_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.font_bytes)
    }

    /// Shape `text` on a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> ComposerResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ComposerError::config(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Shaped (width, height) of `text` at `size_px`.
    pub fn measure(&mut self, text: &str, size_px: f32) -> ComposerResult<(f32, f32)> {
        let layout = self.layout_line(text, size_px, TextBrush::default())?;
        Ok((layout.width(), layout.height()))
    }
}
