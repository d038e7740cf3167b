use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::error::{ComposerError, ComposerResult};

/// Audio stream properties reported by `ffprobe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioStreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Container and first-video-stream properties reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub nb_frames: Option<u64>,
    pub duration_sec: f64,
    pub audio: Option<AudioStreamInfo>,
}

impl MediaInfo {
    pub fn fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    /// Best-effort frame count: `nb_frames` when reported, else duration x fps.
    pub fn frame_count(&self) -> u64 {
        match self.nb_frames {
            Some(n) if n > 0 => n,
            _ => estimate_frames(self.duration_sec, self.fps()),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

pub(crate) fn estimate_frames(duration_sec: f64, fps: f64) -> u64 {
    let n = duration_sec * fps;
    if n.is_finite() && n > 0.0 {
        n.round() as u64
    } else {
        0
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeTags>,
}

#[derive(serde::Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(serde::Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees, normalized to `0..360`.
    fn rotation(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse::<f64>().ok())
            })
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Run `ffprobe` on `path` and describe its first video and audio streams.
#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn probe(path: &Path) -> ComposerResult<MediaInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| ComposerError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ComposerError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(path, &out.stdout)
}

pub(crate) fn parse_probe_json(path: &Path, json: &[u8]) -> ComposerResult<MediaInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| ComposerError::media(format!("ffprobe json parse failed: {e}")))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ComposerError::media(format!("no video stream found in '{}'", path.display()))
        })?;
    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(ComposerError::media(format!(
                "video stream of '{}' has no dimensions",
                path.display()
            )));
        }
    };
    // The decoder applies display rotation, so quarter turns swap the frame geometry.
    let (width, height) = match video.rotation() {
        90 | 270 => (height, width),
        _ => (width, height),
    };

    let (fps_num, fps_den) = video
        .r_frame_rate
        .as_deref()
        .and_then(parse_ff_ratio)
        .filter(|(n, _)| *n > 0)
        .or_else(|| video.avg_frame_rate.as_deref().and_then(parse_ff_ratio))
        .ok_or_else(|| {
            ComposerError::media(format!("invalid frame rate for '{}'", path.display()))
        })?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let nb_frames = video
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok());

    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .map(|s| AudioStreamInfo {
            sample_rate: s
                .sample_rate
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(0),
            channels: s.channels.unwrap_or(0),
        })
        .filter(|a| a.sample_rate > 0 && a.channels > 0);

    Ok(MediaInfo {
        path: path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        nb_frames,
        duration_sec,
        audio,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = match parts.next() {
        Some(b) => b.parse::<u32>().ok()?,
        None => 1,
    };
    if b == 0 {
        return None;
    }
    Some((a, b))
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
