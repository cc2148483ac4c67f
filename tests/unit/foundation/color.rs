use super::*;

fn close(actual: f32, expected_u8: u8) -> bool {
    (actual - f32::from(expected_u8) / 255.0).abs() <= 1.0 / 255.0
}

#[test]
fn parses_with_and_without_hash() {
    let a = parse_hex("#FF8000").unwrap();
    let b = parse_hex("ff8000").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_rgb8(), [255, 128, 0]);
}

#[test]
fn channels_are_big_endian_and_normalized() {
    for (token, rgb) in [
        ("#000000", [0u8, 0, 0]),
        ("#FFFFFF", [255, 255, 255]),
        ("#123456", [0x12, 0x34, 0x56]),
        ("#dc143c", [220, 20, 60]),
        ("8B0000", [139, 0, 0]),
    ] {
        let c = parse_hex(token).unwrap();
        assert!(close(c.r, rgb[0]), "{token} red");
        assert!(close(c.g, rgb[1]), "{token} green");
        assert!(close(c.b, rgb[2]), "{token} blue");
    }
}

#[test]
fn every_single_channel_value_parses_exactly() {
    for v in 0..=255u8 {
        let c = parse_hex(&format!("#{v:02x}00{v:02X}")).unwrap();
        assert_eq!(c.to_rgb8(), [v, 0, v]);
    }
}

#[test]
fn malformed_tokens_fail_fast() {
    for bad in [
        "", "#", "#FFF", "FFF", "#FFFFFFF", "#FF00FF00", "#GG0000", "#+F0000", "# FFFFF",
        " FFFFFF", "FFFFFF ", "##FFFFF", "0xFFFF", "#ÿÿÿ",
    ] {
        let err = parse_hex(bad).unwrap_err();
        assert!(
            matches!(err, TemplateError::InvalidColorFormat(_)),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn from_str_delegates_to_parser() {
    let c: Color = "#00FF00".parse().unwrap();
    assert_eq!(c, Color::from_rgb8(0, 255, 0));
    assert!("nope".parse::<Color>().is_err());
}
