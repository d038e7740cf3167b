use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    config::{
        color::{Rgb8, Rgba8},
        export::ExportConfig,
    },
    foundation::error::{ComposerError, ComposerResult},
};

pub const MAX_FONT_SIZE: u32 = 200;
pub const MAX_BORDER_WIDTH: u32 = 20;
pub const MAX_PADDING: u32 = 50;

/// Largest share of the output width a speaker window may take, in percent.
pub const MAX_WIDTH_PERCENT: u32 = 46;
/// Largest share of the output height a speaker window may take, in percent.
pub const MAX_HEIGHT_PERCENT: u32 = 55;

/// Plate font size: a fixed pixel size or fitted to the available width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    Fixed(u32),
    Auto,
}

impl Default for FontSize {
    fn default() -> Self {
        Self::Fixed(24)
    }
}

impl Serialize for FontSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Fixed(px) => serializer.serialize_u32(*px),
            Self::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for FontSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Px(u32),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Px(px) => Ok(Self::Fixed(px)),
            Repr::Word(w) if w.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Repr::Word(w) => Err(serde::de::Error::custom(format!(
                "font_size must be a pixel size or \"auto\", got \"{w}\""
            ))),
        }
    }
}

/// Window size and name-plate style shared by both speakers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerConfig {
    pub width: u32,
    pub height: u32,
    pub font_size: FontSize,
    pub font_color: Rgb8,
    pub plate_bg_color: Rgba8,
    pub plate_border_color: Rgb8,
    pub plate_border_width: u32,
    pub plate_padding: u32,
    /// Explicit font file. When unset a system sans-serif bold face is looked up.
    pub font_path: Option<PathBuf>,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            font_size: FontSize::default(),
            font_color: Rgb8::WHITE,
            plate_bg_color: Rgb8::BLACK.with_alpha(180),
            plate_border_color: Rgb8::WHITE,
            plate_border_width: 2,
            plate_padding: 10,
            font_path: None,
        }
    }
}

impl SpeakerConfig {
    /// Checks that do not depend on the output resolution.
    pub fn validate(&self) -> ComposerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ComposerError::config(format!(
                "speaker window must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if let FontSize::Fixed(px) = self.font_size
            && !(1..=MAX_FONT_SIZE).contains(&px)
        {
            return Err(ComposerError::config(format!(
                "font_size must be in 1..={MAX_FONT_SIZE}, got {px}"
            )));
        }
        if self.plate_border_width > MAX_BORDER_WIDTH {
            return Err(ComposerError::config(format!(
                "plate_border_width must be in 0..={MAX_BORDER_WIDTH}, got {}",
                self.plate_border_width
            )));
        }
        if self.plate_padding > MAX_PADDING {
            return Err(ComposerError::config(format!(
                "plate_padding must be in 0..={MAX_PADDING}, got {}",
                self.plate_padding
            )));
        }
        if let Some(font) = &self.font_path
            && !font.is_file()
        {
            return Err(ComposerError::config(format!(
                "font file '{}' does not exist",
                font.display()
            )));
        }
        Ok(())
    }

    /// Full validation against the output resolution the windows must fit into.
    pub fn validate_for(&self, export: &ExportConfig) -> ComposerResult<()> {
        self.validate()?;
        let (max_w, max_h) = max_window(export);
        if self.width > max_w {
            return Err(ComposerError::config(format!(
                "speaker width {} exceeds {MAX_WIDTH_PERCENT}% of output width {} (max {max_w})",
                self.width, export.width
            )));
        }
        if self.height > max_h {
            return Err(ComposerError::config(format!(
                "speaker height {} exceeds {MAX_HEIGHT_PERCENT}% of output height {} (max {max_h})",
                self.height, export.height
            )));
        }
        Ok(())
    }
}

/// Largest admissible speaker window for an output resolution.
pub fn max_window(export: &ExportConfig) -> (u32, u32) {
    let w = u64::from(export.width) * u64::from(MAX_WIDTH_PERCENT) / 100;
    let h = u64::from(export.height) * u64::from(MAX_HEIGHT_PERCENT) / 100;
    (w as u32, h as u32)
}
