use super::*;
use crate::foundation::error::TemplateError;

#[test]
fn json_defaults_fill_in_text_and_rectangle() {
    let ops: Vec<PaintOp> = serde_json::from_str(
        r##"[
            {"op": "text", "text": "Speaker Event", "x": 100, "y": 300, "size_px": 70},
            {"op": "rectangle", "x": 1, "y": 2, "width": 3, "height": 4, "stroke": "#FFFFFF"},
            {"op": "linear_gradient", "from": "#000000", "to": "#FFFFFF"}
        ]"##,
    )
    .unwrap();

    assert_eq!(
        ops[0],
        PaintOp::Text {
            text: "Speaker Event".to_owned(),
            x: 100.0,
            y: 300.0,
            size_px: 70.0,
            family: DEFAULT_FONT_FAMILY.to_owned(),
            weight: BOLD_WEIGHT,
            color: "#FFFFFF".to_owned(),
        }
    );
    match &ops[1] {
        PaintOp::Rectangle {
            fill,
            fill_alpha,
            stroke_width,
            stroke_alpha,
            ..
        } => {
            assert!(fill.is_none());
            assert_eq!(*fill_alpha, 1.0);
            assert_eq!(*stroke_width, 1.0);
            assert_eq!(*stroke_alpha, 1.0);
        }
        other => panic!("unexpected op {other:?}"),
    }
    assert!(matches!(
        ops[2],
        PaintOp::LinearGradient {
            axis: Axis::Vertical,
            ..
        }
    ));
    let kinds: Vec<_> = ops.iter().map(PaintOp::kind).collect();
    assert_eq!(kinds, ["text", "rectangle", "linear_gradient"]);
}

#[test]
fn unknown_op_is_rejected() {
    assert!(serde_json::from_str::<PaintOp>(r#"{"op": "blur", "radius": 2}"#).is_err());
}

#[test]
fn resolve_paths_only_touches_relative_images() {
    let base = Path::new("/templates/event");
    let mut rel = PaintOp::Image {
        path: PathBuf::from("logo.png"),
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
    rel.resolve_paths(base);
    assert!(matches!(
        &rel,
        PaintOp::Image { path, .. } if path == Path::new("/templates/event/logo.png")
    ));

    let mut abs = PaintOp::Image {
        path: PathBuf::from("/srv/logo.png"),
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
    abs.resolve_paths(base);
    assert!(matches!(&abs, PaintOp::Image { path, .. } if path == Path::new("/srv/logo.png")));
}

#[test]
fn bad_color_token_fails_at_apply() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    let op = PaintOp::Fill {
        color: "#12345".to_owned(),
    };
    assert!(matches!(
        op.apply(&mut canvas),
        Err(TemplateError::InvalidColorFormat(_))
    ));
}

#[test]
fn rectangle_op_paints_fill() {
    let mut canvas = Canvas::new(100, 100).unwrap();
    PaintOp::Fill {
        color: "#000000".to_owned(),
    }
    .apply(&mut canvas)
    .unwrap();
    PaintOp::Rectangle {
        x: 10.0,
        y: 10.0,
        width: 20.0,
        height: 20.0,
        fill: Some("#FF0000".to_owned()),
        fill_alpha: 1.0,
        stroke: None,
        stroke_width: 0.0,
        stroke_alpha: 1.0,
    }
    .apply(&mut canvas)
    .unwrap();

    let img = canvas.to_rgba8().unwrap();
    assert_eq!(img.get_pixel(15, 15).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);
}
