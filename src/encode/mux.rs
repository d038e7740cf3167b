use std::path::Path;
use std::process::Command;

use crate::{
    audio::MIX_SAMPLE_RATE,
    config::export::ExportConfig,
    encode::select::EncoderSpec,
    foundation::error::{ComposerError, ComposerResult},
};

/// ffmpeg arguments that mux `video` and `audio` into a fast-start MP4 at `out`.
pub fn mux_args(
    video: &Path,
    audio: &Path,
    out: &Path,
    encoder: &EncoderSpec,
    export: &ExportConfig,
) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = ["-y", "-nostdin", "-loglevel", "error"]
        .into_iter()
        .map(Into::into)
        .collect();
    args.extend(encoder.input_args().into_iter().map(Into::into));
    args.push("-i".into());
    args.push(video.into());
    args.push("-i".into());
    args.push(audio.into());
    args.extend(
        ["-map", "0:v:0", "-map", "1:a:0"]
            .into_iter()
            .map(Into::into),
    );
    args.extend(
        encoder
            .video_args(&export.video_codec, export.threads)
            .into_iter()
            .map(Into::into),
    );
    args.extend(
        [
            "-r".to_owned(),
            export.fps.to_string(),
            "-c:a".to_owned(),
            "aac".to_owned(),
            "-b:a".to_owned(),
            export.audio_codec.bitrate.clone(),
            "-ar".to_owned(),
            MIX_SAMPLE_RATE.to_string(),
            "-ac".to_owned(),
            "1".to_owned(),
            "-movflags".to_owned(),
            "+faststart".to_owned(),
        ]
        .into_iter()
        .map(Into::into),
    );
    args.push(out.into());
    args
}

/// Encode the intermediate `video` with `encoder`, add `audio` as AAC and write `out`.
#[tracing::instrument(skip_all, fields(encoder = encoder.name(), out = %out.display()))]
pub fn mux(
    video: &Path,
    audio: &Path,
    out: &Path,
    encoder: &EncoderSpec,
    export: &ExportConfig,
) -> ComposerResult<()> {
    let output = Command::new("ffmpeg")
        .args(mux_args(video, audio, out, encoder, export))
        .output()
        .map_err(|e| {
            ComposerError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
    if !output.status.success() {
        return Err(ComposerError::encoding(format!(
            "{} mux failed with status {}: {}",
            encoder.name(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
