//! Hex color helpers for embed color replacements.

/// Default tolerance for [`hex_colors_are_equal`].
pub const DEFAULT_COLOR_TOLERANCE: i64 = 3000;

/// Color used for embeds without one.
pub const DEFAULT_EMBED_COLOR: &str = "#000000";

/// Check that `color` has the form `#RRGGBB` (case-insensitive).
pub fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Parse a `#RRGGBB` string into a 24-bit integer.
pub fn parse_hex_color(color: &str) -> Option<u32> {
    if !is_valid_hex_color(color) {
        return None;
    }
    u32::from_str_radix(&color[1..], 16).ok()
}

/// Render a 24-bit color as `#RRGGBB`.
pub fn to_hex_color(color: u32) -> String {
    format!("#{:06X}", color & 0xFF_FFFF)
}

/// Compare two hex colors within `tolerance`.
///
/// The six digits after `#` are read as a base-10 integer, stopping at the
/// first non-decimal digit. This is not an RGB distance: `#3463D9` reads as
/// 3463, and a color starting with a letter has no value and never matches.
pub fn hex_colors_are_equal(a: &str, b: &str, tolerance: i64) -> bool {
    match (decimal_prefix(a), decimal_prefix(b)) {
        (Some(a), Some(b)) => (a - b).abs() <= tolerance,
        _ => false,
    }
}

fn decimal_prefix(color: &str) -> Option<i64> {
    let digits = color.get(1..)?;
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}
