use crate::{
    audio::{MIX_PEAK, Waveform},
    foundation::error::{ComposerError, ComposerResult},
};

/// Collapse to mono by averaging channels, then convert to `target_rate` with linear
/// interpolation.
pub fn resample(wave: &Waveform, target_rate: u32) -> ComposerResult<Waveform> {
    if target_rate == 0 {
        return Err(ComposerError::config("resample target rate must be non-zero"));
    }
    if wave.sample_rate == 0 || wave.channels == 0 {
        return Err(ComposerError::audio_extraction(
            "source waveform has zero sample rate or channel count",
        ));
    }

    let mono = downmix(wave);
    if wave.sample_rate == target_rate || mono.is_empty() {
        return Ok(Waveform::mono(target_rate, mono));
    }

    let src_frames = mono.len();
    let out_frames = ((src_frames as u128 * u128::from(target_rate)
        + u128::from(wave.sample_rate) / 2)
        / u128::from(wave.sample_rate)) as usize;
    let step = f64::from(wave.sample_rate) / f64::from(target_rate);

    let mut out = Vec::with_capacity(out_frames);
    for i in 0..out_frames {
        let src_pos = i as f64 * step;
        let i0 = (src_pos.floor() as usize).min(src_frames - 1);
        let i1 = (i0 + 1).min(src_frames - 1);
        let frac = (src_pos - i0 as f64) as f32;
        let v0 = mono[i0];
        let v1 = mono[i1];
        out.push(v0 + (v1 - v0) * frac);
    }
    Ok(Waveform::mono(target_rate, out))
}

fn downmix(wave: &Waveform) -> Vec<f32> {
    let ch = usize::from(wave.channels);
    if ch == 1 {
        return wave.samples.clone();
    }
    let inv = 1.0 / ch as f32;
    wave.samples
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() * inv)
        .collect()
}

/// Pad the shorter waveform with trailing silence to the longer one's length.
///
/// Both inputs must share rate and channel layout. The longer input is returned unchanged and the
/// shorter one keeps its content as an unmodified prefix.
pub fn align(a: &Waveform, b: &Waveform) -> ComposerResult<(Waveform, Waveform)> {
    if a.sample_rate != b.sample_rate || a.channels != b.channels {
        return Err(ComposerError::audio_extraction(format!(
            "cannot align {} Hz/{} ch with {} Hz/{} ch",
            a.sample_rate, a.channels, b.sample_rate, b.channels
        )));
    }
    let frames = a.frames().max(b.frames());
    let mut a = a.clone();
    let mut b = b.clone();
    a.fit_to_len(frames);
    b.fit_to_len(frames);
    Ok((a, b))
}

/// Align, sum and peak-normalize two waveforms.
///
/// A non-silent result peaks at exactly [`MIX_PEAK`]; silence stays silence.
pub fn mix(a: &Waveform, b: &Waveform) -> ComposerResult<Waveform> {
    let (a, b) = align(a, b)?;
    // Sums are f64 and non-finite input counts as silence.
    let sums: Vec<f64> = a
        .samples
        .iter()
        .zip(&b.samples)
        .map(|(x, y)| finite_or_zero(*x) + finite_or_zero(*y))
        .collect();

    let peak = sums.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    let gain = if peak > 0.0 {
        f64::from(MIX_PEAK) / peak
    } else {
        1.0
    };
    let samples = sums
        .iter()
        .map(|s| (s * gain).clamp(-1.0, 1.0) as f32)
        .collect();

    Ok(Waveform {
        sample_rate: a.sample_rate,
        channels: a.channels,
        samples,
    })
}

fn finite_or_zero(s: f32) -> f64 {
    if s.is_finite() { f64::from(s) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
