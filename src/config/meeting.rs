use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ComposerError, ComposerResult};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "webm"];

const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];
const MAX_NAME_CHARS: usize = 100;

/// Inputs of one meeting: a background still, two speaker videos and their display names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeetingConfig {
    pub background_path: PathBuf,
    pub speaker1_path: PathBuf,
    pub speaker2_path: PathBuf,
    pub speaker1_name: String,
    pub speaker2_name: String,
    /// Where the finished export is moved. When absent the artifact stays in the job's
    /// scratch directory.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl MeetingConfig {
    pub fn names(&self) -> [&str; 2] {
        [self.speaker1_name.trim(), self.speaker2_name.trim()]
    }

    pub fn speaker_paths(&self) -> [&Path; 2] {
        [&self.speaker1_path, &self.speaker2_path]
    }

    pub fn validate(&self) -> ComposerResult<()> {
        check_input(&self.background_path, "background", IMAGE_EXTENSIONS)?;
        check_input(&self.speaker1_path, "speaker 1 video", VIDEO_EXTENSIONS)?;
        check_input(&self.speaker2_path, "speaker 2 video", VIDEO_EXTENSIONS)?;
        validate_display_name(&self.speaker1_name)?;
        validate_display_name(&self.speaker2_name)?;

        if let Some(out) = &self.output_path {
            let ext = extension_of(out);
            if ext.as_deref() != Some("mp4") {
                return Err(ComposerError::config(format!(
                    "output path '{}' must end in .mp4",
                    out.display()
                )));
            }
        }
        Ok(())
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn check_input(path: &Path, role: &str, allowed: &[&str]) -> ComposerResult<()> {
    match extension_of(path) {
        Some(ext) if allowed.contains(&ext.as_str()) => {}
        _ => {
            return Err(ComposerError::config(format!(
                "{role} '{}' has an unsupported extension (expected one of: {})",
                path.display(),
                allowed.join(", ")
            )));
        }
    }
    let meta = std::fs::metadata(path).map_err(|e| {
        ComposerError::config(format!("{role} '{}' is not readable: {e}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(ComposerError::config(format!(
            "{role} '{}' is not a regular file",
            path.display()
        )));
    }
    Ok(())
}

/// Display names are 1..=100 chars after trimming and avoid filesystem-hostile characters.
pub fn validate_display_name(name: &str) -> ComposerResult<()> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ComposerError::config("display name must not be empty"));
    }
    if len > MAX_NAME_CHARS {
        return Err(ComposerError::config(format!(
            "display name is {len} chars, max is {MAX_NAME_CHARS}"
        )));
    }
    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(ComposerError::config(format!(
            "display name '{trimmed}' contains forbidden character '{c}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/meeting.rs"]
mod tests;
