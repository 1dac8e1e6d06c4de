//! Typed view of a resolved definition node

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::color::to_paints;
use crate::component::{CHILDREN_KEY, NAME_KEY};
use crate::scene::{AxisAlign, LayoutMode, Padding, Paint};
use crate::tokens::json_kind;

/// Properties shared by frames and rectangles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeProperties {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub padding: Padding,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub fills: Option<Vec<Paint>>,
    pub strokes: Option<Vec<Paint>>,
    pub stroke_weight: Option<f64>,
    pub primary_axis_align: Option<AxisAlign>,
    pub counter_axis_align: Option<AxisAlign>,
    pub item_spacing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameDefinition {
    pub shape: ShapeProperties,
    pub layout_mode: Option<LayoutMode>,
    pub children: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextDefinition {
    pub name: Option<String>,
    pub characters: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub fills: Option<Vec<Paint>>,
}

/// A definition node, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDefinition {
    Frame(FrameDefinition),
    Text(TextDefinition),
    Rectangle(ShapeProperties),
    /// A tag this builder does not know; builds to nothing
    Unknown { tag: String },
}

impl NodeDefinition {
    /// Read a resolved definition
    ///
    /// Properties of the wrong JSON type are skipped, never fatal.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Unknown {
                tag: json_kind(value).to_string(),
            };
        };
        let tag = map.get("type").and_then(Value::as_str).unwrap_or_default();
        let props = Props { map, tag };
        match tag {
            "FRAME" => Self::Frame(FrameDefinition {
                shape: props.shape(),
                layout_mode: props.string("layoutMode").and_then(|s| props.parse(s, LayoutMode::parse)),
                children: props.children(),
            }),
            "TEXT" => Self::Text(TextDefinition {
                name: props.string(NAME_KEY).map(str::to_string),
                characters: props.string("characters").map(str::to_string),
                font_size: props.number("fontSize"),
                font_weight: props.weight("fontWeight"),
                fills: props.paints("fills"),
            }),
            "RECTANGLE" => Self::Rectangle(props.shape()),
            other => Self::Unknown {
                tag: other.to_string(),
            },
        }
    }

    /// Node type tag
    pub fn tag(&self) -> &str {
        match self {
            Self::Frame(_) => "FRAME",
            Self::Text(_) => "TEXT",
            Self::Rectangle(_) => "RECTANGLE",
            Self::Unknown { tag } => tag.as_str(),
        }
    }
}

/// Lenient property accessors over one definition object
struct Props<'a> {
    map: &'a Map<String, Value>,
    tag: &'a str,
}

impl<'a> Props<'a> {
    fn skip(&self, key: &str, value: &Value) {
        debug!(node = self.tag, key, %value, "ignoring property of unexpected type");
    }

    fn number(&self, key: &str) -> Option<f64> {
        let value = self.map.get(key)?;
        value.as_f64().or_else(|| {
            self.skip(key, value);
            None
        })
    }

    fn string(&self, key: &str) -> Option<&'a str> {
        let value = self.map.get(key)?;
        value.as_str().or_else(|| {
            self.skip(key, value);
            None
        })
    }

    /// A font weight given as a number or a numeric string
    fn weight(&self, key: &str) -> Option<f64> {
        let value = self.map.get(key)?;
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok().or_else(|| {
                self.skip(key, value);
                None
            }),
            _ => {
                self.skip(key, value);
                None
            }
        }
    }

    fn parse<T>(&self, raw: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let parsed = parse(raw);
        if parsed.is_none() {
            debug!(node = self.tag, value = raw, "ignoring unknown enumeration value");
        }
        parsed
    }

    fn paints(&self, key: &str) -> Option<Vec<Paint>> {
        let value = self.map.get(key)?;
        match value {
            Value::Array(entries) => Some(to_paints(entries)),
            _ => {
                self.skip(key, value);
                None
            }
        }
    }

    fn padding(&self) -> Padding {
        let mut padding = match self.map.get("padding") {
            Some(Value::Number(n)) => n.as_f64().map(Padding::uniform).unwrap_or_default(),
            Some(Value::Object(sides)) => {
                let side = |key: &str| sides.get(key).and_then(Value::as_f64);
                Padding {
                    top: side("top"),
                    right: side("right"),
                    bottom: side("bottom"),
                    left: side("left"),
                }
            }
            Some(other) => {
                self.skip("padding", other);
                Padding::default()
            }
            None => Padding::default(),
        };
        let sides = [
            ("paddingTop", &mut padding.top),
            ("paddingRight", &mut padding.right),
            ("paddingBottom", &mut padding.bottom),
            ("paddingLeft", &mut padding.left),
        ];
        for (key, slot) in sides {
            if let Some(value) = self.number(key) {
                *slot = Some(value);
            }
        }
        padding
    }

    fn shape(&self) -> ShapeProperties {
        ShapeProperties {
            name: self.string(NAME_KEY).map(str::to_string),
            width: self.number("width"),
            height: self.number("height"),
            corner_radius: self.number("cornerRadius"),
            padding: self.padding(),
            min_width: self.number("minWidth"),
            min_height: self.number("minHeight"),
            fills: self.paints("fills"),
            strokes: self.paints("strokes"),
            stroke_weight: self.number("strokeWeight"),
            primary_axis_align: self
                .string("primaryAxisAlignItems")
                .and_then(|s| self.parse(s, AxisAlign::parse)),
            counter_axis_align: self
                .string("counterAxisAlignItems")
                .and_then(|s| self.parse(s, AxisAlign::parse)),
            item_spacing: self.number("itemSpacing"),
        }
    }

    fn children(&self) -> Vec<NodeDefinition> {
        match self.map.get(CHILDREN_KEY) {
            Some(Value::Array(children)) => children.iter().map(NodeDefinition::from_value).collect(),
            Some(other) => {
                warn!(node = self.tag, kind = json_kind(other), "children is not a list, ignoring");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}
