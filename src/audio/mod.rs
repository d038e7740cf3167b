//! Speaker audio extraction, resampling and two-track mixing.

pub mod extract;
pub mod mix;
pub mod wav;

pub use extract::extract;
pub use mix::{align, mix, resample};
pub use wav::write_wav;

/// Canonical mix rate in Hz.
pub const MIX_SAMPLE_RATE: u32 = 44_100;

/// Peak level of a non-silent mix, as a fraction of full scale.
pub const MIX_PEAK: f32 = 0.8;

/// Interleaved `f32` PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl Waveform {
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples,
        }
    }

    /// `frames` frames of mono silence.
    pub fn silence(sample_rate: u32, frames: usize) -> Self {
        Self::mono(sample_rate, vec![0.0; frames])
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / usize::from(self.channels)
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / f64::from(self.sample_rate)
        }
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Pad with trailing silence or trim the tail so the waveform holds exactly `frames` frames.
    pub fn fit_to_len(&mut self, frames: usize) {
        let len = frames * usize::from(self.channels.max(1));
        self.samples.resize(len, 0.0);
    }
}

/// Frames needed to cover `duration_secs` at `sample_rate`.
pub fn frames_for_duration(duration_secs: f64, sample_rate: u32) -> usize {
    let n = duration_secs * f64::from(sample_rate);
    if n.is_finite() && n > 0.0 {
        n.round() as usize
    } else {
        0
    }
}
