use super::*;

#[test]
fn empty_listing_starts_at_zero() {
    let none: [&str; 0] = [];
    assert_eq!(pick_name(&none, "mp4"), "Video0.mp4");
}

#[test]
fn candidate_is_the_file_count() {
    assert_eq!(pick_name(&["Video0.mp4", "Video1.mp4"], "mp4"), "Video2.mp4");
}

#[test]
fn collisions_step_quadratically() {
    // Ten files with Video3 deleted: Video10 is taken, so 10 + 1 is next.
    let mut names: Vec<String> = (0..11)
        .filter(|i| *i != 3)
        .map(|i| format!("Video{i}.mp4"))
        .collect();
    assert_eq!(names.len(), 10);
    assert_eq!(pick_name(&names, "mp4"), "Video11.mp4");

    names.push("Video11.mp4".into());
    names.push("Video12.mp4".into());
    // 12 entries: 12 taken, 13 free.
    assert_eq!(pick_name(&names, "mp4"), "Video13.mp4");
}

#[test]
fn other_extensions_do_not_collide() {
    assert_eq!(pick_name(&["Video2.mp4", "notes.txt"], "gif"), "Video2.gif");
}

#[test]
fn missing_directory_yields_video0() {
    let dir = std::path::PathBuf::from("target/unit_naming/does_not_exist");
    assert_eq!(next_available_name(&dir, "mp4").unwrap(), "Video0.mp4");
}

#[test]
fn directory_listing_is_scanned() {
    let dir = std::path::PathBuf::from("target/unit_naming/listing");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("Video1.mp4"), b"").unwrap();
    assert_eq!(next_available_name(&dir, "mp4").unwrap(), "Video2.mp4");
}
