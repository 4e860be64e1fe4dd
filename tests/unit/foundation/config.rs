use super::*;

#[test]
fn defaults() {
    let cfg = EditorConfig::default();
    assert_eq!(cfg.max_frames, 32);
    assert_eq!(cfg.fps, Fps { num: 4, den: 1 });
    assert_eq!(cfg.background, Rgba8::WHITE);
    assert!(cfg.onion_skin);
    assert_eq!(cfg.onion_alpha, 25);
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let cfg = EditorConfig::from_json_str(r#"{ "max_frames": 8, "onion_skin": false }"#).unwrap();
    assert_eq!(cfg.max_frames, 8);
    assert!(!cfg.onion_skin);
    assert_eq!(cfg.fps, Fps::default());
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        EditorConfig::from_json_str(r#"{ "max_frames": 0 }"#),
        Err(FlipbookError::Validation(_))
    ));
    assert!(matches!(
        EditorConfig::from_json_str(r#"{ "fps": { "num": 0, "den": 1 } }"#),
        Err(FlipbookError::Validation(_))
    ));
    assert!(matches!(
        EditorConfig::from_json_str(r#"{ "frame_rate": 4 }"#),
        Err(FlipbookError::Serde(_))
    ));
}

#[test]
fn missing_file_is_reported() {
    let err = EditorConfig::from_path("target/definitely/missing/config.json").unwrap_err();
    assert!(err.to_string().contains("read editor config"));
}
