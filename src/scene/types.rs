//! Value types exchanged with a scene host

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a node owned by a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The node constructors a scene provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Frame,
    Text,
    Rectangle,
}

/// An RGB color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Neutral mid-gray used when a color cannot be interpreted
    pub const MID_GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    /// Parse a `#rrggbb` hex string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|c| f64::from(c) / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as a `#rrggbb` hex string
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// A solid paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Rgb,
    pub opacity: f64,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

/// Auto-layout direction of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NONE" => Some(Self::None),
            "HORIZONTAL" => Some(Self::Horizontal),
            "VERTICAL" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Alignment of children along an auto-layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

impl AxisAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MIN" => Some(Self::Min),
            "CENTER" => Some(Self::Center),
            "MAX" => Some(Self::Max),
            "SPACE_BETWEEN" => Some(Self::SpaceBetween),
            _ => None,
        }
    }
}

/// How a frame sizes itself along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingMode {
    #[default]
    Fixed,
    /// Hug the content
    Auto,
}

/// Four-sided padding; `None` sides keep the host's value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

/// Font family and style
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Measured size of a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Rgb::from_hex("#336699").unwrap();
        assert!((c.r - 0.2).abs() < 1e-9);
        assert!((c.g - 0.4).abs() < 1e-9);
        assert!((c.b - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Rgb::from_hex("336699"), None);
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Rgb::from_hex("#1a2b3c").unwrap().to_hex(), "#1a2b3c");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(LayoutMode::parse("VERTICAL"), Some(LayoutMode::Vertical));
        assert_eq!(LayoutMode::parse("vertical"), None);
        assert_eq!(AxisAlign::parse("SPACE_BETWEEN"), Some(AxisAlign::SpaceBetween));
    }
}
