//! CSS color values
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

use crate::parser::ComponentValue;
use crate::tokenizer::CSSToken;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color as 8-bit RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aqua", 0x00FFFF),
    ("black", 0x000000),
    ("blue", 0x0000FF),
    ("brown", 0xA52A2A),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkred", 0x8B0000),
    ("fuchsia", 0xFF00FF),
    ("gold", 0xFFD700),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("grey", 0x808080),
    ("indigo", 0x4B0082),
    ("lightblue", 0xADD8E6),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lime", 0x00FF00),
    ("magenta", 0xFF00FF),
    ("maroon", 0x800000),
    ("navy", 0x000080),
    ("olive", 0x808000),
    ("orange", 0xFFA500),
    ("pink", 0xFFC0CB),
    ("purple", 0x800080),
    ("red", 0xFF0000),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("steelblue", 0x4682B4),
    ("teal", 0x008080),
    ("tomato", 0xFF6347),
    ("violet", 0xEE82EE),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
];

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// [§ 6.2 transparent](https://www.w3.org/TR/css-color-4/#transparent-color)
    /// "transparent black"
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 5.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        // "The three-digit RGB notation (#RGB) is converted into six-digit
        // form (#RRGGBB) by replicating digits, not by adding zeros."
        let short = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(match hex.len() {
            3 => Self::rgb(short(0)?, short(1)?, short(2)?),
            4 => Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            },
            6 => Self::rgb(long(0)?, long(2)?, long(4)?),
            8 => Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            },
            _ => return None,
        })
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        let lower = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|&(_, rgb)| Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
    }

    /// Upper-case `RRGGBB`, without the alpha channel.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

/// Parse a color from a property value: a hash, a name or a color function.
pub fn parse_color(value: &ComponentValue) -> Option<ColorValue> {
    match value {
        ComponentValue::Token(CSSToken::Hash(hex)) => ColorValue::from_hex(hex),
        ComponentValue::Token(CSSToken::Ident(name)) => ColorValue::from_named(name),
        ComponentValue::Function { name, value } if name == "rgb" || name == "rgba" => {
            parse_rgb_function(value)
        }
        _ => None,
    }
}

/// [§ 5.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// Accepts both the comma-separated legacy syntax and the space-separated
/// syntax with `/ alpha`. Channels are numbers (0-255) or percentages.
///
/// An alpha number above 1 is taken to be on the 0-255 scale rather than
/// clamped, so `rgba(220, 20, 60, 100)` has alpha 100/255.
fn parse_rgb_function(args: &[ComponentValue]) -> Option<ColorValue> {
    let mut numbers = Vec::with_capacity(4);
    for arg in args {
        match arg.token()? {
            CSSToken::Number(n) => numbers.push((*n as f32, false)),
            CSSToken::Percentage(p) => numbers.push((*p as f32, true)),
            CSSToken::Whitespace | CSSToken::Comma | CSSToken::Delim('/') => {}
            _ => return None,
        }
    }
    if numbers.len() != 3 && numbers.len() != 4 {
        return None;
    }

    let channel = |(v, percent): (f32, bool)| {
        let v = if percent { v * 255.0 / 100.0 } else { v };
        v.round().clamp(0.0, 255.0) as u8
    };
    let alpha = |(v, percent): (f32, bool)| {
        let v = if percent {
            v * 255.0 / 100.0
        } else if v > 1.0 {
            v
        } else {
            v * 255.0
        };
        v.round().clamp(0.0, 255.0) as u8
    };

    Some(ColorValue {
        r: channel(numbers[0]),
        g: channel(numbers[1]),
        b: channel(numbers[2]),
        a: numbers.get(3).copied().map_or(255, alpha),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declarations;

    fn color(css: &str) -> Option<ColorValue> {
        parse_color(&parse_declarations(&format!("color: {css}"))[0].value[0])
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(color("#fff"), Some(ColorValue::WHITE));
        assert_eq!(color("#ff000080").map(|c| c.a), Some(0x80));
        assert_eq!(color("#f008").map(|c| c.a), Some(0x88));
        assert_eq!(color("#123456").map(|c| c.hex()), Some("123456".into()));
        assert_eq!(color("#12345"), None);
        assert_eq!(color("#ggg"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(color("Crimson").map(|c| c.hex()), Some("DC143C".into()));
        assert_eq!(color("transparent"), Some(ColorValue::TRANSPARENT));
        assert_eq!(color("notacolor"), None);
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(color("rgb(255, 0, 0)"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(color("rgb(100% 0% 0%)"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(color("rgba(0, 0, 0, 0.5)").map(|c| c.a), Some(128));
        assert_eq!(color("rgb(0 0 0 / 50%)").map(|c| c.a), Some(128));
        assert_eq!(color("rgb(300, -5, 0)"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_alpha_above_one_uses_byte_scale() {
        let c = color("rgba(220,20,60,100)").unwrap();
        assert_eq!(c.hex(), "DC143C");
        assert!((c.opacity() - 100.0 / 255.0).abs() < 1e-6);
    }
}
