use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::node::element::path::Data;
use svg::node::element::{Circle, Line, Path, Rectangle};

use crate::geometry::primitives::{Edge, Point, Rect};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SvgDrawOptions {
    ///The theme to use for the svg
    #[serde(default)]
    pub theme: SvgPackTheme,
    ///Draw the body bounds of every component
    #[serde(default = "default_true")]
    pub draw_bodies: bool,
    ///Draw dashed lines from every pad to the nearest pad of its network on another component
    #[serde(default = "default_true")]
    pub draw_connections: bool,
    ///Label every component with its id
    #[serde(default = "default_true")]
    pub draw_labels: bool,
    ///Outline pads and bodies violating the minimum gap
    #[serde(default = "default_true")]
    pub highlight_overlaps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgPackTheme::default(),
            draw_bodies: true,
            draw_connections: true,
            draw_labels: true,
            highlight_overlaps: true,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SvgPackTheme {
    pub stroke_width_multiplier: f64,
    pub background_fill: Color,
    pub body_stroke: Color,
    /// Pads are filled per network, cycling through these colors
    pub network_fills: Vec<Color>,
    pub connection_stroke: Color,
    pub overlap_highlight_color: Color,
}

impl Default for SvgPackTheme {
    fn default() -> Self {
        SvgPackTheme::board()
    }
}

impl SvgPackTheme {
    pub fn board() -> Self {
        SvgPackTheme {
            stroke_width_multiplier: 2.0,
            background_fill: Color(0x1F, 0x4D, 0x2B),
            body_stroke: Color(0xF0, 0xF0, 0xF0),
            network_fills: vec![
                Color(0xD4, 0xA0, 0x17), // GOLD
                Color(0xE0, 0x6C, 0x3A), // COPPER
                Color(0x4F, 0x9D, 0xD9), // BLUE
                Color(0xB5, 0x6A, 0xD1), // PURPLE
                Color(0x5F, 0xC2, 0x7A), // GREEN
                Color(0xD9, 0x4F, 0x70), // PINK
            ],
            connection_stroke: Color(0xFF, 0xFF, 0xFF),
            overlap_highlight_color: Color(0xFF, 0x00, 0x00),
        }
    }

    pub fn gray() -> Self {
        SvgPackTheme {
            stroke_width_multiplier: 2.5,
            background_fill: Color(0xFF, 0xFF, 0xFF),
            body_stroke: Color(0x2D, 0x2D, 0x2D),
            network_fills: vec![
                Color(0x63, 0x63, 0x63),
                Color(0x8F, 0x8F, 0x8F),
                Color(0xB0, 0xB0, 0xB0),
            ],
            connection_stroke: Color(0x40, 0x40, 0x40),
            overlap_highlight_color: Color(0xD0, 0x00, 0x00),
        }
    }

    /// Fill of the pads in the `idx`-th network
    pub fn network_fill(&self, idx: usize) -> Color {
        match self.network_fills.is_empty() {
            true => Color(0x80, 0x80, 0x80),
            false => self.network_fills[idx % self.network_fills.len()],
        }
    }
}

pub fn change_brightness(color: Color, fraction: f64) -> Color {
    let Color(r, g, b) = color;

    let r = (r as f64 * fraction).clamp(0.0, 255.0) as u8;
    let g = (g as f64 * fraction).clamp(0.0, 255.0) as u8;
    let b = (b as f64 * fraction).clamp(0.0, 255.0) as u8;
    Color(r, g, b)
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color(pub u8, pub u8, pub u8);

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("invalid color: {s}, expected #RRGGBB");
        }
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        Ok(Color(r, g, b))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1)
    }
    path.set("d", data)
}

pub fn point(Point(x, y): Point, fill: Option<&str>, rad: Option<f64>) -> Circle {
    Circle::new()
        .set("cx", x)
        .set("cy", y)
        .set("r", rad.unwrap_or(0.5))
        .set("fill", fill.unwrap_or("black"))
}

pub fn circle(center: Point, radius: f64, params: &[(&str, &str)]) -> Circle {
    let mut circle = Circle::new()
        .set("cx", center.0)
        .set("cy", center.1)
        .set("r", radius);
    for param in params {
        circle = circle.set(param.0, param.1)
    }
    circle
}

pub fn line(edge: Edge, params: &[(&str, &str)]) -> Line {
    let mut line = Line::new()
        .set("x1", edge.start.0)
        .set("y1", edge.start.1)
        .set("x2", edge.end.0)
        .set("y2", edge.end.1);
    for param in params {
        line = line.set(param.0, param.1)
    }
    line
}

pub fn rect(rect: &Rect, params: &[(&str, &str)]) -> Rectangle {
    let mut svg_rect = Rectangle::new()
        .set("x", rect.x_min)
        .set("y", rect.y_min)
        .set("width", rect.width())
        .set("height", rect.height());
    for param in params {
        svg_rect = svg_rect.set(param.0, param.1)
    }
    svg_rect
}

pub fn edge_data(edge: Edge) -> Data {
    Data::new()
        .move_to((edge.start.0, edge.start.1))
        .line_to((edge.end.0, edge.end.1))
}

/// View box around `bbox`, enlarged by `fraction` of its largest dimension on every side
pub fn view_box(bbox: &Rect, fraction: f64) -> (f64, f64, f64, f64) {
    let margin = f64::max(bbox.span() * fraction, 1.0);
    (
        bbox.x_min - margin,
        bbox.y_min - margin,
        bbox.width() + 2.0 * margin,
        bbox.height() + 2.0 * margin,
    )
}
