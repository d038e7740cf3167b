use super::*;
use proptest::prelude::*;

#[test]
fn resample_averages_channels() {
    let stereo = Waveform {
        sample_rate: 8_000,
        channels: 2,
        samples: vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0],
    };
    let out = resample(&stereo, 8_000).unwrap();
    assert_eq!(out.channels, 1);
    assert_eq!(out.samples, vec![0.5, 0.5, 0.0]);
}

#[test]
fn resample_interpolates_linearly() {
    let ramp = Waveform::mono(2, vec![0.0, 1.0]);
    let out = resample(&ramp, 4).unwrap();
    assert_eq!(out.sample_rate, 4);
    assert_eq!(out.samples.len(), 4);
    assert!((out.samples[1] - 0.5).abs() < 1e-6);
    assert!((out.samples[2] - 1.0).abs() < 1e-6);
}

#[test]
fn resample_keeps_duration() {
    let one_sec = Waveform::mono(48_000, vec![0.1; 48_000]);
    let out = resample(&one_sec, 44_100).unwrap();
    assert_eq!(out.samples.len(), 44_100);
    assert!((out.duration_secs() - 1.0).abs() < 1e-6);
}

#[test]
fn align_rejects_mismatched_rates() {
    let a = Waveform::silence(44_100, 10);
    let b = Waveform::silence(48_000, 10);
    assert!(align(&a, &b).is_err());
}

#[test]
fn mix_peaks_at_target_level() {
    let a = Waveform::mono(10, vec![0.9, -0.9, 0.3]);
    let b = Waveform::mono(10, vec![0.9, 0.0]);
    let m = mix(&a, &b).unwrap();
    assert_eq!(m.samples.len(), 3);
    assert!((m.peak() - MIX_PEAK).abs() < 1e-6);
    assert!((m.samples[0] - MIX_PEAK).abs() < 1e-6);
}

#[test]
fn mix_of_silence_with_voice_keeps_length() {
    let voice = Waveform::mono(10, vec![0.2; 30]);
    let silent = Waveform::silence(10, 0);
    let m = mix(&voice, &silent).unwrap();
    assert_eq!(m.frames(), 30);

    let quiet = mix(&Waveform::silence(10, 5), &Waveform::silence(10, 7)).unwrap();
    assert_eq!(quiet.frames(), 7);
    assert_eq!(quiet.peak(), 0.0);
}

fn wave(max_len: usize) -> impl Strategy<Value = Waveform> {
    prop::collection::vec(-1.0f32..=1.0, 0..max_len).prop_map(|s| Waveform::mono(44_100, s))
}

fn loud_wave(max_len: usize) -> impl Strategy<Value = Waveform> {
    prop::collection::vec(prop::num::f32::NORMAL | prop::num::f32::ZERO, 0..max_len)
        .prop_map(|s| Waveform::mono(44_100, s))
}

#[test]
fn overflowing_sum_is_still_bounded() {
    let a = Waveform::mono(44_100, vec![3e38, 0.5]);
    let b = Waveform::mono(44_100, vec![3e38, 0.5]);
    let m = mix(&a, &b).unwrap();
    assert!((m.samples[0] - MIX_PEAK).abs() < 1e-6);
    assert!(m.samples[1] >= 0.0 && m.samples[1] < 1e-6);
}

#[test]
fn non_finite_samples_are_dropped() {
    let a = Waveform::mono(44_100, vec![f32::INFINITY, f32::NAN, 0.25]);
    let b = Waveform::mono(44_100, vec![0.0, 0.0, 0.25]);
    let m = mix(&a, &b).unwrap();
    assert_eq!(m.samples[0], 0.0);
    assert_eq!(m.samples[1], 0.0);
    assert!((m.samples[2] - MIX_PEAK).abs() < 1e-6);
}

proptest! {
    #[test]
    fn align_pads_shorter_as_prefix(a in wave(64), b in wave(64)) {
        let (aa, bb) = align(&a, &b).unwrap();
        prop_assert_eq!(aa.samples.len(), bb.samples.len());
        prop_assert_eq!(aa.samples.len(), a.samples.len().max(b.samples.len()));
        prop_assert_eq!(&aa.samples[..a.samples.len()], &a.samples[..]);
        prop_assert_eq!(&bb.samples[..b.samples.len()], &b.samples[..]);
        prop_assert!(aa.samples[a.samples.len()..].iter().all(|s| *s == 0.0));
        prop_assert!(bb.samples[b.samples.len()..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn mix_never_clips(a in wave(64), b in wave(64)) {
        let m = mix(&a, &b).unwrap();
        prop_assert!(m.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        prop_assert!(m.peak() <= MIX_PEAK + 1e-6);
    }

    #[test]
    fn mix_never_clips_at_any_amplitude(a in loud_wave(64), b in loud_wave(64)) {
        let m = mix(&a, &b).unwrap();
        prop_assert!(m.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        prop_assert!(m.peak() <= MIX_PEAK + 1e-6);
    }
}
