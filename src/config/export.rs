use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Canvas,
    error::{ComposerError, ComposerResult},
};

pub const MAX_DIMENSION: u32 = 8192;
pub const MAX_FPS: u32 = 120;
pub const MAX_CRF: u8 = 51;

/// x264 speed/quality ladder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    #[default]
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }

    /// Preset name accepted by `h264_qsv`, which stops at `veryfast`.
    pub fn qsv_str(self) -> &'static str {
        match self {
            Self::Ultrafast | Self::Superfast => "veryfast",
            other => other.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoCodecConfig {
    pub preset: Preset,
    pub crf: u8,
    /// Target bitrate in ffmpeg notation, e.g. `"5000k"`.
    pub bitrate: String,
}

impl Default for VideoCodecConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Fast,
            crf: 23,
            bitrate: "5000k".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCodecConfig {
    pub bitrate: String,
}

impl Default for AudioCodecConfig {
    fn default() -> Self {
        Self {
            bitrate: "128k".to_owned(),
        }
    }
}

/// Output resolution, frame rate and codec parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub video_codec: VideoCodecConfig,
    pub audio_codec: AudioCodecConfig,
    /// Encoder thread count; 0 leaves the choice to ffmpeg.
    pub threads: u32,
    /// Advisory: try hardware encoders first.
    pub use_gpu: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            video_codec: VideoCodecConfig::default(),
            audio_codec: AudioCodecConfig::default(),
            threads: 0,
            use_gpu: true,
        }
    }
}

impl ExportConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn validate(&self) -> ComposerResult<()> {
        for (label, v) in [("width", self.width), ("height", self.height)] {
            if v == 0 || v > MAX_DIMENSION {
                return Err(ComposerError::config(format!(
                    "export {label} must be in 1..={MAX_DIMENSION}, got {v}"
                )));
            }
            if v % 2 != 0 {
                return Err(ComposerError::config(format!(
                    "export {label} must be even for yuv420p output, got {v}"
                )));
            }
        }
        if !(1..=MAX_FPS).contains(&self.fps) {
            return Err(ComposerError::config(format!(
                "fps must be in 1..={MAX_FPS}, got {}",
                self.fps
            )));
        }
        if self.video_codec.crf > MAX_CRF {
            return Err(ComposerError::config(format!(
                "crf must be in 0..={MAX_CRF}, got {}",
                self.video_codec.crf
            )));
        }
        validate_bitrate("video bitrate", &self.video_codec.bitrate)?;
        validate_bitrate("audio bitrate", &self.audio_codec.bitrate)?;
        Ok(())
    }
}

/// Accepts a positive integer optionally suffixed by `k` or `M`.
pub fn validate_bitrate(label: &str, s: &str) -> ComposerResult<()> {
    let digits = s
        .strip_suffix(['k', 'K', 'm', 'M'])
        .unwrap_or(s);
    let ok = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.parse::<u64>().is_ok_and(|n| n > 0);
    if !ok {
        return Err(ComposerError::config(format!(
            "{label} '{s}' is not a bitrate like \"5000k\""
        )));
    }
    Ok(())
}
