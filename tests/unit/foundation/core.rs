use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(4, 0).is_err());
    assert!(Fps::new(4, 1).is_ok());
}

#[test]
fn tick_interval_uses_integer_millis() {
    assert_eq!(Fps::default().tick_interval(), Duration::from_millis(250));
    assert_eq!(Fps::new(3, 1).unwrap().tick_interval(), Duration::from_millis(333));
    assert_eq!(Fps::new(1, 2).unwrap().tick_interval(), Duration::from_millis(2000));
}

#[test]
fn canvas_rejects_empty_sides() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(3, 5).unwrap().area(), 15);
}

#[test]
fn rgba_array_conversions_agree() {
    let c = Rgba8::from_array([1, 2, 3, 4]);
    assert_eq!(c.to_array(), [1, 2, 3, 4]);
    assert_eq!(Rgba8::MAGENTA.to_array(), [255, 0, 255, 255]);
}
