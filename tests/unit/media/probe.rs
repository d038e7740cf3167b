use super::*;

const SAMPLE: &str = r#"{
  "streams": [
    {"codec_type": "video", "width": 640, "height": 480,
     "r_frame_rate": "30000/1001", "nb_frames": "150"},
    {"codec_type": "audio", "sample_rate": "48000", "channels": 2}
  ],
  "format": {"duration": "5.005000"}
}"#;

#[test]
fn parses_video_and_audio_streams() {
    let info = parse_probe_json(Path::new("a.mp4"), SAMPLE.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (640, 480));
    assert_eq!((info.fps_num, info.fps_den), (30000, 1001));
    assert!((info.fps() - 29.97).abs() < 0.01);
    assert_eq!(info.frame_count(), 150);
    assert_eq!(
        info.audio,
        Some(AudioStreamInfo {
            sample_rate: 48_000,
            channels: 2
        })
    );
}

#[test]
fn frame_count_falls_back_to_duration() {
    let json = r#"{"streams": [{"codec_type": "video", "width": 8, "height": 8,
        "r_frame_rate": "25/1"}], "format": {"duration": "2.0"}}"#;
    let info = parse_probe_json(Path::new("a.webm"), json.as_bytes()).unwrap();
    assert_eq!(info.nb_frames, None);
    assert_eq!(info.frame_count(), 50);
    assert!(!info.has_audio());
}

#[test]
fn missing_video_stream_names_the_file() {
    let json = r#"{"streams": [{"codec_type": "audio", "sample_rate": "44100", "channels": 1}]}"#;
    let err = parse_probe_json(Path::new("voice.mp4"), json.as_bytes()).unwrap_err();
    assert!(matches!(err, ComposerError::Media(_)));
    assert!(err.to_string().contains("voice.mp4"));
}

#[test]
fn ratio_parsing() {
    assert_eq!(parse_ff_ratio("30/1"), Some((30, 1)));
    assert_eq!(parse_ff_ratio("24"), Some((24, 1)));
    assert_eq!(parse_ff_ratio("0/0"), None);
    assert_eq!(parse_ff_ratio("x/1"), None);
}

#[test]
fn quarter_turn_rotation_swaps_dimensions() {
    let json = r#"{"streams": [{"codec_type": "video", "width": 1920, "height": 1080,
        "r_frame_rate": "30/1",
        "side_data_list": [{"side_data_type": "Display Matrix",
            "displaymatrix": "\n00000000:            0       65536           0\n",
            "rotation": -90}]}],
        "format": {"duration": "1.0"}}"#;
    let info = parse_probe_json(Path::new("phone.mp4"), json.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (1080, 1920));
}

#[test]
fn legacy_rotate_tag_is_honoured() {
    let json = r#"{"streams": [{"codec_type": "video", "width": 640, "height": 360,
        "r_frame_rate": "25/1", "tags": {"rotate": "270"}}]}"#;
    let info = parse_probe_json(Path::new("old.mov"), json.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (360, 640));

    let json = r#"{"streams": [{"codec_type": "video", "width": 640, "height": 360,
        "r_frame_rate": "25/1", "tags": {"rotate": "180"}}]}"#;
    let info = parse_probe_json(Path::new("flipped.mov"), json.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (640, 360));
}
