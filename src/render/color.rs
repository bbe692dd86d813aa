//! CSS colour strings -> plotters colours.
//!
//! Series colours are written in the CSS syntax the browser renderer
//! understands (`rgba(75, 192, 192, 0.5)`, `#36a2eb`). The SVG renderer needs
//! them as RGBA components.

use plotters::style::RGBAColor;

/// Used when a configured colour cannot be parsed.
pub const FALLBACK_PALETTE: [RGBAColor; 5] = [
    RGBAColor(75, 192, 192, 0.5),
    RGBAColor(255, 206, 86, 0.5),
    RGBAColor(54, 162, 235, 0.5),
    RGBAColor(153, 102, 255, 0.5),
    RGBAColor(255, 99, 132, 0.5),
];

/// Parse `rgb()`, `rgba()`, `#rgb` and `#rrggbb`.
pub fn parse_css_color(s: &str) -> Option<RGBAColor> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    let (body, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |p: &str| p.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha {
        parts[3].parse::<f64>().ok()?.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(RGBAColor(r, g, b, a))
}

fn parse_hex(hex: &str) -> Option<RGBAColor> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        3 => Some(RGBAColor(
            digit(0, 1)? * 17,
            digit(1, 1)? * 17,
            digit(2, 1)? * 17,
            1.0,
        )),
        6 => Some(RGBAColor(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?, 1.0)),
        _ => None,
    }
}

/// Parsed colour, or a palette entry picked by position.
pub fn color_or_fallback(s: &str, index: usize) -> RGBAColor {
    parse_css_color(s).unwrap_or(FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()])
}
