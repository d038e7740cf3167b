use std::path::Path;

use crate::{
    audio::Waveform,
    foundation::error::{ComposerError, ComposerResult},
};

/// Write `wave` as 16-bit signed PCM WAV.
pub fn write_wav(wave: &Waveform, path: &Path) -> ComposerResult<()> {
    if wave.sample_rate == 0 || wave.channels == 0 {
        return Err(ComposerError::encoding(
            "cannot write a wav with zero sample rate or channel count",
        ));
    }
    let spec = hound::WavSpec {
        channels: wave.channels,
        sample_rate: wave.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let wav_err = |e: hound::Error| {
        ComposerError::encoding(format!("failed to write wav '{}': {e}", path.display()))
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
    for &s in &wave.samples {
        writer.write_sample(to_i16(s)).map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)
}

fn to_i16(s: f32) -> i16 {
    let s = if s.is_finite() { s.clamp(-1.0, 1.0) } else { 0.0 };
    (s * f32::from(i16::MAX)).round() as i16
}
