use std::collections::HashMap;
use std::process::{Command, Stdio};

use parking_lot::Mutex;

use crate::config::export::VideoCodecConfig;

/// Render node handed to VAAPI encoders.
pub const VAAPI_DEVICE: &str = "/dev/dri/renderD128";

/// H.264 encoders the selector knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    Nvenc,
    Qsv,
    Vaapi,
    Software,
}

/// Hardware candidates in preference order.
pub const GPU_CANDIDATES: &[EncoderKind] =
    &[EncoderKind::Nvenc, EncoderKind::Qsv, EncoderKind::Vaapi];

impl EncoderKind {
    /// Get the ffmpeg encoder name
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Self::Nvenc => "h264_nvenc",
            Self::Qsv => "h264_qsv",
            Self::Vaapi => "h264_vaapi",
            Self::Software => "libx264",
        }
    }

    pub fn is_hardware(self) -> bool {
        !matches!(self, Self::Software)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Nvenc => "H.264 NVENC (NVIDIA)",
            Self::Qsv => "H.264 Quick Sync (Intel)",
            Self::Vaapi => "H.264 VAAPI (Hardware)",
            Self::Software => "libx264 (Software)",
        }
    }
}

/// Decides whether a hardware encoder works on this machine.
pub trait EncoderProbe: Send + Sync {
    fn is_usable(&self, kind: EncoderKind) -> bool;
}

impl<F> EncoderProbe for F
where
    F: Fn(EncoderKind) -> bool + Send + Sync,
{
    fn is_usable(&self, kind: EncoderKind) -> bool {
        self(kind)
    }
}

/// Probes encoders with the system `ffmpeg`: the encoder must be listed by `ffmpeg -encoders`
/// and survive a one-frame trial encode. Results are cached per instance.
#[derive(Debug, Default)]
pub struct FfmpegProbe {
    encoders_listing: Mutex<Option<String>>,
    verdicts: Mutex<HashMap<EncoderKind, bool>>,
}

impl FfmpegProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn listed(&self, kind: EncoderKind) -> bool {
        let mut listing = self.encoders_listing.lock();
        let text = listing.get_or_insert_with(|| {
            Command::new("ffmpeg")
                .args(["-hide_banner", "-encoders"])
                .stderr(Stdio::null())
                .output()
                .ok()
                .map(|o| String::from_utf8_lossy(&o.stdout).to_string())
                .unwrap_or_default()
        });
        text.contains(kind.ffmpeg_name())
    }

    fn trial_encode(kind: EncoderKind) -> bool {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .args(["-hide_banner", "-nostdin", "-v", "error"]);
        if kind == EncoderKind::Vaapi {
            cmd.args(["-vaapi_device", VAAPI_DEVICE]);
        }
        cmd.args([
            "-f",
            "lavfi",
            "-i",
            "color=c=black:s=256x256:r=1:d=1",
            "-frames:v",
            "1",
        ]);
        if kind == EncoderKind::Vaapi {
            cmd.args(["-vf", "format=nv12,hwupload"]);
        }
        cmd.args(["-c:v", kind.ffmpeg_name(), "-f", "null", "-"]);
        cmd.status().map(|s| s.success()).unwrap_or(false)
    }
}

impl EncoderProbe for FfmpegProbe {
    fn is_usable(&self, kind: EncoderKind) -> bool {
        if let Some(v) = self.verdicts.lock().get(&kind) {
            return *v;
        }
        let usable = self.listed(kind) && Self::trial_encode(kind);
        tracing::debug!(encoder = kind.ffmpeg_name(), usable, "probed encoder");
        self.verdicts.lock().insert(kind, usable);
        usable
    }
}

/// The encoder chosen for one export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EncoderSpec {
    pub kind: EncoderKind,
}

impl EncoderSpec {
    pub fn software() -> Self {
        Self {
            kind: EncoderKind::Software,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.ffmpeg_name()
    }

    /// Arguments that must precede the first `-i`.
    pub fn input_args(&self) -> Vec<String> {
        match self.kind {
            EncoderKind::Vaapi => vec!["-vaapi_device".into(), VAAPI_DEVICE.into()],
            _ => Vec::new(),
        }
    }

    /// Output-side video codec arguments for this encoder.
    pub fn video_args(&self, codec: &VideoCodecConfig, threads: u32) -> Vec<String> {
        let crf = codec.crf.to_string();
        let crf = crf.as_str();
        let bitrate = codec.bitrate.as_str();
        let bufsize = double_bitrate(bitrate);
        let mut args: Vec<String> = vec!["-c:v".into(), self.name().into()];
        match self.kind {
            EncoderKind::Nvenc => {
                args.extend(
                    [
                        "-preset",
                        "p4",
                        "-rc",
                        "vbr",
                        "-cq",
                        crf,
                        "-b:v",
                        bitrate,
                        "-maxrate",
                        bitrate,
                        "-bufsize",
                        bufsize.as_str(),
                        "-pix_fmt",
                        "yuv420p",
                    ]
                    .map(String::from),
                );
            }
            EncoderKind::Qsv => {
                args.extend(
                    [
                        "-preset",
                        codec.preset.qsv_str(),
                        "-global_quality",
                        crf,
                        "-b:v",
                        bitrate,
                        "-pix_fmt",
                        "nv12",
                    ]
                    .map(String::from),
                );
            }
            EncoderKind::Vaapi => {
                args.extend(
                    [
                        "-vf",
                        "format=nv12,hwupload",
                        "-qp",
                        crf,
                        "-b:v",
                        bitrate,
                    ]
                    .map(String::from),
                );
            }
            EncoderKind::Software => {
                args.extend(
                    [
                        "-preset",
                        codec.preset.as_str(),
                        "-crf",
                        crf,
                        "-b:v",
                        bitrate,
                        "-pix_fmt",
                        "yuv420p",
                    ]
                    .map(String::from),
                );
            }
        }
        if threads > 0 {
            args.extend(["-threads".to_owned(), threads.to_string()]);
        }
        args
    }
}

/// `"5000k"` -> `"10000k"`; inputs that do not parse are passed through.
fn double_bitrate(bitrate: &str) -> String {
    let (digits, suffix) = match bitrate.find(|c: char| !c.is_ascii_digit()) {
        Some(i) => bitrate.split_at(i),
        None => (bitrate, ""),
    };
    match digits.parse::<u64>() {
        Ok(n) => format!("{}{suffix}", n.saturating_mul(2)),
        Err(_) => bitrate.to_owned(),
    }
}

/// Pick the encoder for an export. With `use_gpu`, hardware candidates are tried in order and
/// only until one is usable; otherwise, or when none is, the software encoder is returned.
pub fn select(use_gpu: bool, probe: &dyn EncoderProbe) -> EncoderSpec {
    if use_gpu
        && let Some(kind) = GPU_CANDIDATES.iter().copied().find(|k| probe.is_usable(*k))
    {
        tracing::info!(encoder = kind.ffmpeg_name(), "using hardware encoder");
        return EncoderSpec { kind };
    }
    if use_gpu {
        tracing::info!("no usable hardware encoder, falling back to libx264");
    }
    EncoderSpec::software()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/select.rs"]
mod tests;
