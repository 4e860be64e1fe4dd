use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlipbookError::storage("x")
            .to_string()
            .contains("storage error:")
    );
    assert!(
        FlipbookError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        FlipbookError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FlipbookError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn notices_are_distinguished_from_failures() {
    assert!(FlipbookError::CapacityExceeded { max: 32 }.is_notice());
    assert!(FlipbookError::BoundaryReached(Boundary::Start).is_notice());
    assert!(!FlipbookError::storage("disk").is_notice());
    assert!(!FlipbookError::encoding("codec").is_notice());
}

#[test]
fn boundary_messages_name_the_end() {
    assert_eq!(
        FlipbookError::BoundaryReached(Boundary::End).to_string(),
        "end of frames"
    );
    assert_eq!(
        FlipbookError::BoundaryReached(Boundary::Start).to_string(),
        "beginning of frames"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlipbookError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
