use crate::foundation::{
    core::Color,
    error::{TemplateError, TemplateResult},
};

/// Parse a `#RRGGBB` or `RRGGBB` token into a normalized [`Color`].
///
/// Digits are case-insensitive. Anything else (short forms, alpha, signs,
/// whitespace) is rejected rather than scanned leniently.
pub fn parse_hex(token: &str) -> TemplateResult<Color> {
    let digits = token.strip_prefix('#').unwrap_or(token);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TemplateError::invalid_color(format!(
            "\"{token}\" is not #RRGGBB"
        )));
    }

    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| TemplateError::invalid_color(format!("\"{token}\": {e}")))?;
    Ok(Color::from_rgb8(
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    ))
}

impl std::str::FromStr for Color {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
