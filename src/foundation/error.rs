/// Convenience result type used across the compositor.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Top-level error taxonomy used by canvas, builder and fetcher APIs.
#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    /// A color token was not a 6-digit hex RGB value.
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// Canvas creation with a zero or oversized dimension.
    #[error("invalid canvas dimensions {width}x{height}: each side must be in 1..=65535")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A source image could not be read or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Serialization or filesystem failure while writing output.
    #[error("io error: {0}")]
    Io(String),

    /// A paint call was made on a canvas that has been released.
    #[error("canvas used after release")]
    UseAfterRelease,

    /// The external background collaborator failed, timed out or produced nothing.
    #[error("external process failure: {0}")]
    ExternalProcess(String),

    /// Invalid numeric parameters or document contents.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemplateError {
    /// Build a [`TemplateError::InvalidColorFormat`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColorFormat(msg.into())
    }

    /// Build a [`TemplateError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`TemplateError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`TemplateError::ExternalProcess`] value.
    pub fn external_process(msg: impl Into<String>) -> Self {
        Self::ExternalProcess(msg.into())
    }

    /// Build a [`TemplateError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Errors that indicate misuse of the API and should abort immediately.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. } | Self::UseAfterRelease)
    }

    /// Errors after which the affected layer is dropped and composition continues.
    pub fn is_recoverable_layer_error(&self) -> bool {
        matches!(self, Self::ImageLoad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
