use super::*;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, b"x").unwrap();
    p
}

fn meeting(dir: &Path) -> MeetingConfig {
    MeetingConfig {
        background_path: touch(dir, "bg.png"),
        speaker1_path: touch(dir, "a.mp4"),
        speaker2_path: touch(dir, "b.MOV"),
        speaker1_name: "Alice".to_owned(),
        speaker2_name: "  Bob  ".to_owned(),
        output_path: None,
    }
}

#[test]
fn valid_meeting_passes() {
    let dir = tempfile::tempdir().unwrap();
    let m = meeting(dir.path());
    m.validate().unwrap();
    assert_eq!(m.names(), ["Alice", "Bob"]);
    let [p1, p2] = m.speaker_paths();
    assert!(p1.ends_with("a.mp4"));
    assert!(p2.ends_with("b.MOV"));
}

#[test]
fn missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = meeting(dir.path());
    m.speaker2_path = dir.path().join("gone.mp4");
    let err = m.validate().unwrap_err();
    assert!(matches!(err, ComposerError::Config(_)));
    assert!(err.to_string().contains("gone.mp4"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = meeting(dir.path());
    m.background_path = touch(dir.path(), "bg.gif");
    assert!(matches!(m.validate(), Err(ComposerError::Config(_))));

    let mut m = meeting(dir.path());
    m.output_path = Some(dir.path().join("out.avi"));
    assert!(m.validate().is_err());
}

#[test]
fn display_name_bounds() {
    assert!(validate_display_name("Dr. Jane Doe").is_ok());
    assert!(validate_display_name("   ").is_err());
    assert!(validate_display_name(&"x".repeat(101)).is_err());
    assert!(validate_display_name(&"é".repeat(100)).is_ok());
    assert!(validate_display_name("a|b").is_err());
    assert!(validate_display_name("what?").is_err());
}
