use std::{path::Path, sync::Arc};

use crate::foundation::error::{TemplateError, TemplateResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Build from straight (non-premultiplied) RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> TemplateResult<Self> {
        if width == 0 || height == 0 {
            return Err(TemplateError::image_load("image has a zero dimension"));
        }
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(TemplateError::image_load(format!(
                "expected {} bytes for {width}x{height} RGBA8, got {}",
                width as usize * height as usize * 4,
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// A single-color image, mostly useful for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> TemplateResult<Self> {
        let px = width as usize * height as usize;
        Self::from_rgba8(width, height, rgba.repeat(px))
    }
}

/// Decode PNG bytes and convert to premultiplied RGBA8.
///
/// Other formats are rejected even when the codec could read them.
pub fn decode_png(bytes: &[u8]) -> TemplateResult<SourceImage> {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => {}
        Ok(other) => {
            return Err(TemplateError::image_load(format!(
                "unsupported image format {other:?} (only PNG is accepted)"
            )));
        }
        Err(e) => return Err(TemplateError::image_load(format!("unrecognized image data: {e}"))),
    }

    let dyn_img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| TemplateError::image_load(format!("decode png: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode a PNG file.
pub fn load_png(path: &Path) -> TemplateResult<SourceImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| TemplateError::image_load(format!("read '{}': {e}", path.display())))?;
    decode_png(&bytes).map_err(|e| match e {
        TemplateError::ImageLoad(msg) => {
            TemplateError::image_load(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
