//! Brand palette shared by every PopTop document.

use crate::types::Color;

pub const PRIMARY: Color = Color::from_rgb8(0x1a, 0x36, 0x5d);
pub const SECONDARY: Color = Color::from_rgb8(0xc9, 0xa2, 0x27);
pub const ACCENT: Color = Color::from_rgb8(0x2d, 0x37, 0x48);
pub const TEXT: Color = Color::from_rgb8(0x2d, 0x37, 0x48);
pub const TEXT_LIGHT: Color = Color::from_rgb8(0x71, 0x80, 0x96);
pub const LIGHT: Color = Color::from_rgb8(0xf7, 0xfa, 0xfc);
pub const SUCCESS: Color = Color::from_rgb8(0x38, 0xa1, 0x69);
pub const WARNING: Color = Color::from_rgb8(0xd6, 0x9e, 0x2e);
pub const DANGER: Color = Color::from_rgb8(0xe5, 0x3e, 0x3e);
pub const RULE: Color = Color::from_rgb8(0xe2, 0xe8, 0xf0);
pub const WARNING_BG: Color = Color::from_rgb8(0xff, 0xfb, 0xeb);
pub const WHITE: Color = Color::WHITE;

/// Hex form used inside `<font color="...">` markup.
pub fn markup_hex(color: Color) -> String {
    format!("#{}", color.hex())
}
