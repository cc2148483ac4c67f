use std::path::Path;

use crate::foundation::error::{TemplateError, TemplateResult};

/// Unpremultiply a rendered pixmap into an owned straight-alpha image.
pub(crate) fn pixmap_to_rgba_image(pixmap: vello_cpu::Pixmap) -> TemplateResult<image::RgbaImage> {
    let (width, height) = (u32::from(pixmap.width()), u32::from(pixmap.height()));
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for px in pixmap.take_unpremultiplied() {
        data.extend_from_slice(&[px.r, px.g, px.b, px.a]);
    }
    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| TemplateError::io("rendered pixel buffer has unexpected length"))
}

/// Create parent directories for an output path if needed.
pub fn ensure_parent_dir(path: &Path) -> TemplateResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            TemplateError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    Ok(())
}

/// Write `img` as PNG regardless of the path's extension.
pub(crate) fn write_png(img: &image::RgbaImage, path: &Path) -> TemplateResult<()> {
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| TemplateError::io(format!("write png '{}': {e}", path.display())))
}
