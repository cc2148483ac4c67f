use super::*;

#[test]
fn default_style_is_bold_sans() {
    let s = TextStyle::new(30.0, Color::WHITE);
    assert_eq!(s.family, DEFAULT_FONT_FAMILY);
    assert_eq!(s.weight, BOLD_WEIGHT);
    s.validate().unwrap();
}

#[test]
fn style_validation_rejects_bad_values() {
    let base = TextStyle::new(30.0, Color::WHITE);
    assert!(TextStyle { size_px: 0.0, ..base.clone() }.validate().is_err());
    assert!(
        TextStyle {
            size_px: f32::NAN,
            ..base.clone()
        }
        .validate()
        .is_err()
    );
    assert!(base.clone().with_weight(0.0).validate().is_err());
    assert!(base.clone().with_weight(1200.0).validate().is_err());
    assert!(base.clone().with_family("  ").validate().is_err());
    base.with_family("Inter, serif").with_weight(400.0).validate().unwrap();
}

#[test]
fn garbage_font_bytes_do_not_register() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register_font(b"not a font".to_vec()).is_err());
}

#[test]
fn cpu_font_is_cached_per_blob_and_index() {
    let mut engine = TextLayoutEngine::new();
    let a = engine.cpu_font(7, 0, b"abc");
    let b = engine.cpu_font(7, 0, b"ignored on cache hit");
    assert_eq!(a.data.data(), b.data.data());
    let c = engine.cpu_font(7, 1, b"xyz");
    assert_eq!(c.index, 1);
}
