use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    compose::{builder::TemplateBuilder, fallback::paint_fallback_background, ops::PaintOp},
    fetch::BackgroundFetcher,
    foundation::error::{TemplateError, TemplateResult},
    render::encode::ensure_parent_dir,
};

/// A complete template: canvas size, optional background, fonts, ordered layers, output path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateDoc {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<PathBuf>,
    #[serde(default)]
    pub layers: Vec<PaintOp>,
    pub output: PathBuf,
}

/// Fetched background request; `seed` drives the fallback when fetching fails.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundSpec {
    pub theme: String,
    pub path: PathBuf,
    #[serde(default)]
    pub seed: u64,
}

impl TemplateDoc {
    pub fn from_json_str(json: &str) -> TemplateResult<Self> {
        let doc: Self = serde_json::from_str(json)
            .map_err(|e| TemplateError::validation(format!("template json: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a template file; relative paths inside it resolve against its directory.
    pub fn from_json_file(path: &Path) -> TemplateResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::io(format!("read '{}': {e}", path.display())))?;
        let mut doc = Self::from_json_str(&json).map_err(|e| match e {
            TemplateError::Validation(msg) => {
                TemplateError::validation(format!("'{}': {msg}", path.display()))
            }
            other => other,
        })?;
        if let Some(base) = path.parent() {
            doc.resolve_paths(base);
        }
        Ok(doc)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output);
        if let Some(bg) = &mut self.background {
            resolve(&mut bg.path);
        }
        self.fonts.iter_mut().for_each(resolve);
        for layer in &mut self.layers {
            layer.resolve_paths(base);
        }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if self.width == 0 || self.height == 0 || self.width > 65_535 || self.height > 65_535 {
            return Err(TemplateError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(TemplateError::validation("output path must be non-empty"));
        }
        if let Some(bg) = &self.background {
            if bg.theme.trim().is_empty() {
                return Err(TemplateError::validation(
                    "background theme must be non-empty",
                ));
            }
            if bg.path.as_os_str().is_empty() {
                return Err(TemplateError::validation(
                    "background path must be non-empty",
                ));
            }
        }
        Ok(())
    }
}

/// Render one template on its own canvas and write it to `doc.output`.
#[tracing::instrument(skip_all, fields(output = %doc.output.display()))]
pub fn render_template(
    doc: &TemplateDoc,
    fetcher: &dyn BackgroundFetcher,
) -> TemplateResult<PathBuf> {
    doc.validate()?;
    let mut builder = TemplateBuilder::build(doc.width, doc.height)?;

    for font in &doc.fonts {
        let bytes = std::fs::read(font)
            .map_err(|e| TemplateError::io(format!("read font '{}': {e}", font.display())))?;
        let families = builder.canvas_mut().register_font(bytes)?;
        tracing::debug!(font = %font.display(), ?families, "registered font");
    }

    if let Some(bg) = &doc.background {
        ensure_parent_dir(&bg.path)?;
        if fetcher.fetch_background(&bg.theme, &bg.path) {
            builder.logo(
                &bg.path,
                0.0,
                0.0,
                f64::from(doc.width),
                f64::from(doc.height),
            )?;
        } else {
            tracing::warn!(theme = %bg.theme, "using fallback background");
            paint_fallback_background(builder.canvas_mut(), bg.seed)?;
        }
    }

    for layer in &doc.layers {
        builder.apply(layer)?;
    }

    builder.finish(&doc.output)?;
    Ok(doc.output.clone())
}

/// Render many templates in parallel; each job owns an independent canvas.
///
/// Results are returned in input order.
pub fn render_templates(
    docs: &[TemplateDoc],
    fetcher: &dyn BackgroundFetcher,
) -> Vec<TemplateResult<PathBuf>> {
    docs.par_iter()
        .map(|doc| render_template(doc, fetcher))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/doc.rs"]
mod tests;
