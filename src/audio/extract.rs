use std::path::Path;
use std::process::Command;

use crate::{
    audio::Waveform,
    foundation::error::{ComposerError, ComposerResult},
    media::probe,
};

/// Decode the first audio stream of `path` to interleaved `f32` at its native rate and layout.
///
/// Sources without an audio stream yield [`ComposerError::AudioExtraction`]; callers treat that as
/// a silent track.
#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn extract(path: &Path) -> ComposerResult<Waveform> {
    let info = probe::probe(path)?;
    let Some(stream) = info.audio else {
        return Err(ComposerError::audio_extraction(format!(
            "'{}' has no audio stream",
            path.display()
        )));
    };

    let out = Command::new("ffmpeg")
        .args(["-nostdin", "-v", "error", "-i"])
        .arg(path)
        .args([
            "-map",
            "0:a:0",
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &stream.channels.to_string(),
            "-ar",
            &stream.sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            ComposerError::audio_extraction(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Err(ComposerError::audio_extraction(format!(
                "'{}' has no audio stream",
                path.display()
            )));
        }
        return Err(ComposerError::audio_extraction(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    let samples = f32le_to_samples(&out.stdout)?;
    tracing::debug!(
        sample_rate = stream.sample_rate,
        channels = stream.channels,
        samples = samples.len(),
        "decoded audio"
    );
    Ok(Waveform {
        sample_rate: stream.sample_rate,
        channels: stream.channels,
        samples,
    })
}

pub(crate) fn f32le_to_samples(bytes: &[u8]) -> ComposerResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ComposerError::audio_extraction(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
