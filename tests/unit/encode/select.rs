use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn no_gpu_means_software_without_probing() {
    let calls = AtomicUsize::new(0);
    let probe = |_: EncoderKind| {
        calls.fetch_add(1, Ordering::SeqCst);
        true
    };
    assert_eq!(select(false, &probe).kind, EncoderKind::Software);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn first_usable_candidate_wins_and_later_ones_are_not_probed() {
    let probed = Mutex::new(Vec::new());
    let probe = |k: EncoderKind| {
        probed.lock().push(k);
        k == EncoderKind::Qsv
    };
    assert_eq!(select(true, &probe).kind, EncoderKind::Qsv);
    assert_eq!(*probed.lock(), vec![EncoderKind::Nvenc, EncoderKind::Qsv]);
}

#[test]
fn unavailable_gpu_falls_back_to_software() {
    let probe = |_: EncoderKind| false;
    let spec = select(true, &probe);
    assert_eq!(spec, EncoderSpec::software());
    assert_eq!(spec.name(), "libx264");
}

#[test]
fn software_args_carry_preset_crf_and_bitrate() {
    let codec = VideoCodecConfig::default();
    let args = EncoderSpec::software().video_args(&codec, 4);
    assert_eq!(
        args,
        [
            "-c:v", "libx264", "-preset", "fast", "-crf", "23", "-b:v", "5000k", "-pix_fmt",
            "yuv420p", "-threads", "4"
        ]
    );
}

#[test]
fn hardware_args_use_encoder_specific_quality_flags() {
    let codec = VideoCodecConfig::default();
    let nvenc = EncoderSpec {
        kind: EncoderKind::Nvenc,
    }
    .video_args(&codec, 0);
    assert!(nvenc.windows(2).any(|w| w == ["-cq", "23"]));
    assert!(nvenc.windows(2).any(|w| w == ["-bufsize", "10000k"]));

    let qsv = EncoderSpec {
        kind: EncoderKind::Qsv,
    }
    .video_args(&codec, 0);
    assert!(qsv.windows(2).any(|w| w == ["-global_quality", "23"]));

    let vaapi = EncoderSpec {
        kind: EncoderKind::Vaapi,
    };
    assert!(vaapi.video_args(&codec, 0).windows(2).any(|w| w == ["-qp", "23"]));
    assert_eq!(vaapi.input_args(), ["-vaapi_device", VAAPI_DEVICE]);
    assert!(EncoderSpec::software().input_args().is_empty());
}

#[test]
fn bufsize_doubles_bitrate() {
    assert_eq!(double_bitrate("5000k"), "10000k");
    assert_eq!(double_bitrate("8M"), "16M");
    assert_eq!(double_bitrate("128000"), "256000");
    assert_eq!(double_bitrate("k"), "k");
}

#[test]
fn qsv_clamps_presets_it_does_not_know() {
    use crate::config::export::Preset;

    let qsv = EncoderSpec {
        kind: EncoderKind::Qsv,
    };
    let software = EncoderSpec::software();
    for (preset, expected) in [
        (Preset::Ultrafast, "veryfast"),
        (Preset::Superfast, "veryfast"),
        (Preset::Veryfast, "veryfast"),
        (Preset::Slow, "slow"),
    ] {
        let codec = VideoCodecConfig {
            preset,
            ..VideoCodecConfig::default()
        };
        let args = qsv.video_args(&codec, 0);
        assert!(args.windows(2).any(|w| w == ["-preset", expected]));
        let args = software.video_args(&codec, 0);
        assert!(args.windows(2).any(|w| w == ["-preset", preset.as_str()]));
    }
}
