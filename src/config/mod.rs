//! Fixed-shape configuration records with serde defaults and validation.

pub mod color;
pub mod export;
pub mod meeting;
pub mod speaker;

use serde::{Deserialize, Serialize};

pub use color::{Rgb8, Rgba8};
pub use export::{AudioCodecConfig, ExportConfig, Preset, VideoCodecConfig};
pub use meeting::MeetingConfig;
pub use speaker::{FontSize, SpeakerConfig};

use crate::foundation::error::{ComposerError, ComposerResult};

/// Everything needed to preview or export one meeting, as read from a JSON job file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub meeting: MeetingConfig,
    #[serde(default)]
    pub speaker: SpeakerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl JobSpec {
    pub fn from_json(json: &str) -> ComposerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ComposerError::config(format!("invalid job json: {e}")))
    }

    pub fn from_path(path: &std::path::Path) -> ComposerResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ComposerError::config(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Validates every record; the speaker windows are checked against the export resolution.
    pub fn validate(&self) -> ComposerResult<()> {
        validate_all(&self.meeting, &self.speaker, &self.export)
    }
}

pub fn validate_all(
    meeting: &MeetingConfig,
    speaker: &SpeakerConfig,
    export: &ExportConfig,
) -> ComposerResult<()> {
    export.validate()?;
    speaker.validate_for(export)?;
    meeting.validate()
}
