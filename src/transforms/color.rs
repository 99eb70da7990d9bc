//! Color parsing and formatting for the color transforms.

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity.
    pub a: f64,
}

impl Color {
    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` or `rgba(...)`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        parse_functional(body)
    }

    /// `#rrggbb`, dropping alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbb` when opaque, otherwise `rgba(r, g, b, a)`.
    #[must_use]
    pub fn to_css(self) -> String {
        let alpha = round2(self.a);
        if alpha >= 1.0 {
            self.to_hex()
        } else {
            format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
        }
    }

    /// Flutter `Color(0xAARRGGBB)` constructor.
    #[must_use]
    pub fn to_flutter(self) -> String {
        format!(
            "Color(0x{:02X}{:02X}{:02X}{:02X})",
            alpha_byte(self.a),
            self.r,
            self.g,
            self.b
        )
    }
}

fn round2(a: f64) -> f64 {
    (a * 100.0).round() / 100.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_byte(a: f64) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = hex
        .chars()
        .filter_map(|c| c.to_digit(16).and_then(|d| u8::try_from(d).ok()))
        .collect();
    let (r, g, b, a) = match digits.as_slice() {
        [r, g, b] => (r * 17, g * 17, b * 17, 255),
        [r, g, b, a] => (r * 17, g * 17, b * 17, a * 17),
        [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2)
        }
        _ => return None,
    };
    Some(Color {
        r,
        g,
        b,
        a: f64::from(a) / 255.0,
    })
}

fn parse_functional(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let (r, g, b, a) = match parts.as_slice() {
        [r, g, b] => (*r, *g, *b, None),
        [r, g, b, a] => (*r, *g, *b, Some(*a)),
        _ => return None,
    };
    let alpha = match a {
        None => 1.0,
        Some(a) => match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => a.parse::<f64>().ok()?,
        },
    };
    if !(0.0..=1.0).contains(&alpha) {
        return None;
    }
    Some(Color {
        r: channel(r)?,
        g: channel(g)?,
        b: channel(b)?,
        a: alpha,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 2.55,
        None => s.parse::<f64>().ok()?,
    };
    (0.0..=255.0)
        .contains(&value)
        .then(|| value.round() as u8)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        let full = Color::parse("#336699").unwrap();
        assert_eq!((full.r, full.g, full.b), (0x33, 0x66, 0x99));
        assert_eq!(Color::parse("#369").unwrap(), full);
        let translucent = Color::parse("#33669980").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_functional_forms() {
        let c = Color::parse("rgba(51, 102, 153, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b), (51, 102, 153));
        assert!((c.a - 0.5).abs() < f64::EPSILON);
        assert_eq!(Color::parse("rgb(51 102 153)").unwrap().to_hex(), "#336699");
    }

    #[test]
    fn rejects_non_colors() {
        assert!(Color::parse("linear-gradient(#fff, #000)").is_none());
        assert!(Color::parse("#33669").is_none());
        assert!(Color::parse("#zzzzzz").is_none());
        assert!(Color::parse("rgb(300, 0, 0)").is_none());
        assert!(Color::parse("4px").is_none());
    }

    #[test]
    fn css_output_keeps_hex_when_opaque() {
        assert_eq!(Color::parse("#336699").unwrap().to_css(), "#336699");
        assert_eq!(
            Color::parse("#33669980").unwrap().to_css(),
            "rgba(51, 102, 153, 0.5)"
        );
    }

    #[test]
    fn hex_output_is_lowercase() {
        assert_eq!(Color::parse("#ABCDEF").unwrap().to_hex(), "#abcdef");
    }

    #[test]
    fn flutter_output_puts_alpha_first() {
        assert_eq!(Color::parse("#336699").unwrap().to_flutter(), "Color(0xFF336699)");
        assert_eq!(
            Color::parse("rgba(51, 102, 153, 0.5)").unwrap().to_flutter(),
            "Color(0x80336699)"
        );
    }
}
