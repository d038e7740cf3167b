use std::path::Path;

use anyhow::Context as _;

use crate::{
    compose::{
        frame::{FrameCompositor, render_plates},
        layout::layout,
    },
    config::{
        self, export::ExportConfig, meeting::MeetingConfig, speaker::SpeakerConfig,
    },
    foundation::{
        core::BgrFrame,
        error::{ComposerError, ComposerResult},
    },
    media::reader::{MediaReader, load_background},
};

pub const PREVIEW_JPEG_QUALITY: u8 = 90;

/// A single composed frame, JPEG-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl PreviewImage {
    pub fn save(&self, path: &Path) -> ComposerResult<()> {
        std::fs::write(path, &self.jpeg)
            .with_context(|| format!("failed to write preview '{}'", path.display()))?;
        Ok(())
    }
}

/// Compose the first decodable frame of each speaker over the background.
///
/// Opens its own readers, so it can run alongside exports.
#[tracing::instrument(skip_all, fields(
    speaker1 = %meeting.speaker1_path.display(),
    speaker2 = %meeting.speaker2_path.display(),
))]
pub fn create_preview(
    meeting: &MeetingConfig,
    speaker: &SpeakerConfig,
    export: &ExportConfig,
) -> ComposerResult<PreviewImage> {
    config::validate_all(meeting, speaker, export)?;

    let layout = layout(export, speaker);
    let background = load_background(&meeting.background_path)?;
    let plates = render_plates(meeting, speaker, &layout)?;
    let compositor = FrameCompositor::new(&background, plates, layout)?;

    let [p1, p2] = meeting.speaker_paths();
    let s1 = MediaReader::open(p1)?.first_frame()?;
    let s2 = MediaReader::open(p2)?.first_frame()?;
    let frame = compositor.compose(&s1, &s2)?;

    let jpeg = encode_jpeg(&frame, PREVIEW_JPEG_QUALITY)?;
    tracing::info!(bytes = jpeg.len(), "preview composed");
    Ok(PreviewImage {
        width: frame.width,
        height: frame.height,
        jpeg,
    })
}

pub fn encode_jpeg(frame: &BgrFrame, quality: u8) -> ComposerResult<Vec<u8>> {
    let mut rgb = frame.data.clone();
    for px in rgb.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| ComposerError::encoding(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}
