//! Colors and gradient stops.
//!
//! Gradient stops are written the way CSS writes them: `#rrggbb`, `#rgb`,
//! `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or a named color.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// Color value in RGBA format (straight, not premultiplied)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS-style color string.
    pub fn parse(s: &str) -> HeatmapResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex_color(hex).ok_or_else(|| HeatmapError::InvalidColor(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(|| HeatmapError::InvalidColor(s.to_string()));
        }

        named_color(&lower).ok_or_else(|| HeatmapError::InvalidColor(s.to_string()))
    }

    /// Channels as an array, in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut c = hex.chars().map(|ch| ch.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::rgb(c.next()??, c.next()??, c.next()??))
        }
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f32 = s.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => {
            let v: f32 = alpha.parse().ok()?;
            if !v.is_finite() {
                return None;
            }
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Color::new(r, g, b, a))
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "lime" => Color::rgb(0, 255, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// A color stop in a gradient, positioned in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position of the stop along the intensity axis
    pub stop: f64,

    /// The color at this stop
    pub color: String,
}

impl ColorStop {
    pub fn new(stop: f64, color: impl Into<String>) -> Self {
        Self {
            stop,
            color: color.into(),
        }
    }

    /// Parse the stop's color string.
    pub fn rgba(&self) -> HeatmapResult<Color> {
        Color::parse(&self.color)
    }
}

/// The common blue to red gradient.
pub fn default_gradient() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.45, "rgb(0,0,255)"),
        ColorStop::new(0.55, "rgb(0,255,255)"),
        ColorStop::new(0.65, "rgb(0,255,0)"),
        ColorStop::new(0.95, "yellow"),
        ColorStop::new(1.0, "rgb(255,0,0)"),
    ]
}

/// Validate gradient stops and return them parsed and sorted by position.
pub fn resolve_stops(stops: &[ColorStop]) -> HeatmapResult<Vec<(f64, Color)>> {
    if stops.is_empty() {
        return Err(HeatmapError::InvalidInput(
            "gradient must have at least one color stop".to_string(),
        ));
    }

    let mut resolved = Vec::with_capacity(stops.len());
    for stop in stops {
        if !stop.stop.is_finite() || !(0.0..=1.0).contains(&stop.stop) {
            return Err(HeatmapError::InvalidInput(format!(
                "gradient stop {} is outside [0, 1]",
                stop.stop
            )));
        }
        resolved.push((stop.stop, stop.rgba()?));
    }

    // Stable sort keeps declaration order for duplicate positions
    resolved.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(resolved)
}
