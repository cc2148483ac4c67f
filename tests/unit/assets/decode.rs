use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_png(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn transparent_pixels_zero_their_color() {
    let img = SourceImage::from_rgba8(1, 1, vec![255, 255, 255, 0]).unwrap();
    assert_eq!(img.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn non_png_and_garbage_are_image_load_errors() {
    let img = image::RgbaImage::from_raw(1, 1, vec![1, 2, 3, 255]).unwrap();
    let bmp = encode(img, image::ImageFormat::Bmp);
    assert!(matches!(decode_png(&bmp), Err(TemplateError::ImageLoad(_))));

    assert!(matches!(
        decode_png(b"definitely not an image"),
        Err(TemplateError::ImageLoad(_))
    ));

    let mut truncated = encode(
        image::RgbaImage::from_pixel(8, 8, image::Rgba([9, 9, 9, 255])),
        image::ImageFormat::Png,
    );
    truncated.truncate(24);
    assert!(matches!(
        decode_png(&truncated),
        Err(TemplateError::ImageLoad(_))
    ));
}

#[test]
fn missing_file_names_the_path() {
    let err = load_png(Path::new("target/decode_unit/does-not-exist.png")).unwrap_err();
    assert!(matches!(err, TemplateError::ImageLoad(_)));
    assert!(err.to_string().contains("does-not-exist.png"));
}

#[test]
fn from_rgba8_rejects_bad_lengths() {
    assert!(SourceImage::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(SourceImage::from_rgba8(0, 2, vec![]).is_err());
    let ok = SourceImage::solid(3, 2, [10, 20, 30, 255]).unwrap();
    assert_eq!(ok.rgba8_premul.len(), 24);
}
