use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TemplateError::invalid_color("x")
            .to_string()
            .contains("invalid color format:")
    );
    assert!(
        TemplateError::image_load("x")
            .to_string()
            .contains("image load error:")
    );
    assert!(TemplateError::io("x").to_string().contains("io error:"));
    assert!(
        TemplateError::external_process("x")
            .to_string()
            .contains("external process failure:")
    );
    assert!(
        TemplateError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert_eq!(
        TemplateError::UseAfterRelease.to_string(),
        "canvas used after release"
    );
}

#[test]
fn invalid_dimensions_reports_both_sides() {
    let err = TemplateError::InvalidDimensions {
        width: 0,
        height: 600,
    };
    assert!(err.to_string().contains("0x600"));
}

#[test]
fn error_classes() {
    assert!(TemplateError::UseAfterRelease.is_programmer_error());
    assert!(
        TemplateError::InvalidDimensions {
            width: 0,
            height: 0
        }
        .is_programmer_error()
    );
    assert!(!TemplateError::image_load("x").is_programmer_error());

    assert!(TemplateError::image_load("x").is_recoverable_layer_error());
    assert!(!TemplateError::invalid_color("x").is_recoverable_layer_error());
    assert!(!TemplateError::UseAfterRelease.is_recoverable_layer_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TemplateError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
