use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA, each channel in `[0, 1]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn from_rgba_255(rgba: [f64; 4]) -> Self {
        Color {
            r: (rgba[0] / 255.0).clamp(0.0, 1.0),
            g: (rgba[1] / 255.0).clamp(0.0, 1.0),
            b: (rgba[2] / 255.0).clamp(0.0, 1.0),
            a: rgba[3].clamp(0.0, 1.0),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

/// Parses the colour strings a stylesheet would accept for a label:
/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a few names.
pub fn parse_color(color_str: &str) -> Option<Color> {
    let s = color_str.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = s.strip_prefix("rgba(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args, true);
    }
    if let Some(args) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args, false);
    }
    let named = match s.as_str() {
        "white" => [255.0, 255.0, 255.0, 1.0],
        "black" => [0.0, 0.0, 0.0, 1.0],
        "red" => [255.0, 0.0, 0.0, 1.0],
        "green" => [0.0, 128.0, 0.0, 1.0],
        "blue" => [0.0, 0.0, 255.0, 1.0],
        "gray" | "grey" => [128.0, 128.0, 128.0, 1.0],
        "transparent" => [0.0, 0.0, 0.0, 0.0],
        _ => return None,
    };
    Some(Color::from_rgba_255(named))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f64);
    match hex.len() {
        3 => {
            let mut rgb = [0.0; 3];
            for (i, ch) in hex.chars().enumerate() {
                let doubled: String = [ch, ch].iter().collect();
                rgb[i] = channel(&doubled)?;
            }
            Some(Color::from_rgba_255([rgb[0], rgb[1], rgb[2], 1.0]))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 {
                channel(&hex[6..8])? / 255.0
            } else {
                1.0
            };
            Some(Color::from_rgba_255([r, g, b, a]))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(|p| p.trim()).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let r = parts[0].parse::<f64>().ok()?;
    let g = parts[1].parse::<f64>().ok()?;
    let b = parts[2].parse::<f64>().ok()?;
    let a = if with_alpha {
        parts[3].parse::<f64>().ok()?
    } else {
        1.0
    };
    Some(Color::from_rgba_255([r, g, b, a]))
}
