use super::*;
use crate::foundation::error::TemplateError;

#[test]
fn chained_calls_composite_in_order() {
    let mut b = TemplateBuilder::build(40, 40).unwrap();
    b.background("#000000")
        .unwrap()
        .rectangle(0.0, 0.0, 20.0, 40.0, Some("#FF0000"), None, 0.0)
        .unwrap()
        .overlay("000000", 0.5)
        .unwrap();

    let img = b.canvas_mut().to_rgba8().unwrap();
    let left = img.get_pixel(5, 5).0;
    assert!(left[0].abs_diff(128) <= 2, "{left:?}");
    assert_eq!(img.get_pixel(30, 5).0, [0, 0, 0, 255]);
}

#[test]
fn unreadable_logo_is_skipped() {
    let mut b = TemplateBuilder::build(10, 10).unwrap();
    b.background("#0000FF")
        .unwrap()
        .logo(
            Path::new("target/builder_unit/no-such-logo.png"),
            0.0,
            0.0,
            10.0,
            10.0,
        )
        .unwrap();
    let img = b.canvas_mut().to_rgba8().unwrap();
    assert!(img.pixels().all(|p| p.0 == [0, 0, 255, 255]));
}

#[test]
fn invalid_color_is_not_swallowed() {
    let mut b = TemplateBuilder::build(10, 10).unwrap();
    assert!(matches!(
        b.background("#GG0000"),
        Err(TemplateError::InvalidColorFormat(_))
    ));
    assert!(matches!(
        b.gradient("#000000", "#FFF", Axis::Horizontal),
        Err(TemplateError::InvalidColorFormat(_))
    ));
}

#[test]
fn finish_saves_and_releases() {
    let out = Path::new("target/builder_unit/finish.png");
    let _ = std::fs::remove_file(out);
    let mut b = TemplateBuilder::build(3, 2).unwrap();
    b.background("#102030").unwrap();
    b.finish(out).unwrap();

    let img = image::open(out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert!(img.pixels().all(|p| p.0 == [0x10, 0x20, 0x30, 255]));
}

#[test]
fn apply_skips_missing_image_but_not_bad_geometry() {
    let mut b = TemplateBuilder::build(10, 10).unwrap();
    b.apply(&PaintOp::Image {
        path: "target/builder_unit/missing.png".into(),
        x: 0.0,
        y: 0.0,
        width: 5.0,
        height: 5.0,
    })
    .unwrap();
    assert!(
        b.apply(&PaintOp::Circle {
            x: 1.0,
            y: 1.0,
            radius: 0.0,
            color: "#FFFFFF".to_owned(),
            opacity: 1.0,
        })
        .is_err()
    );
}

#[test]
fn released_canvas_fails_fast_through_builder() {
    let mut b = TemplateBuilder::build(4, 4).unwrap();
    b.canvas_mut().release();
    let err = b
        .logo(Path::new("whatever.png"), 0.0, 0.0, 1.0, 1.0)
        .unwrap_err();
    assert!(err.is_programmer_error());
}

#[test]
fn undrawable_in_memory_image_is_skipped() {
    let empty = SourceImage {
        width: 0,
        height: 0,
        rgba8_premul: std::sync::Arc::new(Vec::new()),
    };
    let mut b = TemplateBuilder::build(10, 10).unwrap();
    b.background("#00FF00")
        .unwrap()
        .image(&empty, 0.0, 0.0, 10.0, 10.0)
        .unwrap();
    let img = b.canvas_mut().to_rgba8().unwrap();
    assert!(img.pixels().all(|p| p.0 == [0, 255, 0, 255]));

    // Bad target geometry is still a hard error.
    let ok = SourceImage::solid(2, 2, [255, 0, 0, 255]).unwrap();
    assert!(matches!(
        b.image(&ok, 0.0, 0.0, 0.0, 10.0),
        Err(TemplateError::Validation(_))
    ));
}
