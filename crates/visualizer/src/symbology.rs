//! Thin style resolver: maps a partial `StyleSpec` onto renderer-native
//! color/width/material values.

use annotations::{MarkerSize, StyleSpec};

pub type Color = [f32; 4];

pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
const DEFAULT_STROKE: Color = [1.0, 0.0, 0.0, 1.0];
const TRANSPARENT: Color = [0.0, 0.0, 0.0, 0.0];
const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum LineMaterial {
    Solid(Color),
    Dashed { color: Color, dash_length: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: Color,
    pub stroke_width: f64,
    pub line_material: LineMaterial,
    pub show_outline: bool,
    pub fill: Color,
    pub marker_color: Color,
    pub marker_size_px: f64,
}

pub fn resolve(spec: &StyleSpec) -> ResolvedStyle {
    let stroke = color_with_opacity(spec.stroke.as_deref(), spec.stroke_opacity, DEFAULT_STROKE);
    let fill = color_with_opacity(spec.fill.as_deref(), spec.fill_opacity, TRANSPARENT);
    let stroke_width = spec.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);

    let line_material = match spec.stroke_dasharray {
        Some(dash_length) if dash_length > 0.0 => LineMaterial::Dashed {
            color: stroke,
            dash_length,
        },
        _ => LineMaterial::Solid(stroke),
    };

    ResolvedStyle {
        stroke,
        stroke_width,
        line_material,
        show_outline: spec.stroke_opacity != Some(0.0),
        fill,
        marker_color: color_with_opacity(spec.marker_color.as_deref(), None, WHITE),
        marker_size_px: marker_size_px(spec.marker_size),
    }
}

pub fn marker_size_px(size: Option<MarkerSize>) -> f64 {
    match size.unwrap_or(MarkerSize::Medium) {
        MarkerSize::Small => 4.0,
        MarkerSize::Medium => 6.0,
        MarkerSize::Large => 8.0,
    }
}

fn color_with_opacity(name: Option<&str>, opacity: Option<f64>, fallback: Color) -> Color {
    let mut color = name.and_then(parse_color).unwrap_or(fallback);
    if let Some(opacity) = opacity {
        color[3] = opacity.clamp(0.0, 1.0) as f32;
    }
    color
}

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` and the handful of CSS names
/// the annotation palette actually uses.
pub fn parse_color(name: &str) -> Option<Color> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    match name.to_ascii_lowercase().as_str() {
        "white" => Some(WHITE),
        "black" => Some([0.0, 0.0, 0.0, 1.0]),
        "red" => Some([1.0, 0.0, 0.0, 1.0]),
        "green" => Some([0.0, 0.5, 0.0, 1.0]),
        "blue" => Some([0.0, 0.0, 1.0, 1.0]),
        "yellow" => Some([1.0, 1.0, 0.0, 1.0]),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| char::from(c).to_digit(16).map(|d| d as f32);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Some([r / 15.0, g / 15.0, b / 15.0, 1.0])
        }
        6 | 8 => {
            let mut out = [0.0f32; 4];
            out[3] = 1.0;
            for (i, pair) in bytes.chunks_exact(2).enumerate() {
                let hi = nibble(pair[0])?;
                let lo = nibble(pair[1])?;
                out[i] = (hi * 16.0 + lo) / 255.0;
            }
            Some(out)
        }
        _ => None,
    }
}
