//! Paint normalization
//!
//! Fill and stroke entries arrive in whatever shape the definition author (or
//! the token registry) used. Every entry becomes a solid [`Paint`]; anything
//! that cannot be read as a color turns into mid-gray.

use serde_json::{Map, Value};
use tracing::debug;

use crate::scene::{Paint, Rgb};

/// Convert one fill/stroke entry into a solid paint
///
/// Accepted shapes, in order:
/// - a paint object carrying a `color` (`{"type": "SOLID", "color": {...}, "opacity": 0.5}`)
/// - a color object with `r`, `g`, `b` channels in `0..=1`
/// - a `#rrggbb` string
/// - a design-token object whose `value` is a `#rrggbb` string
pub fn to_paint(value: &Value) -> Paint {
    match value {
        Value::Object(map) if map.contains_key("color") => Paint {
            color: normalize_color(&map["color"]),
            opacity: map.get("opacity").and_then(Value::as_f64).unwrap_or(1.0),
        },
        other => Paint::solid(normalize_color(other)),
    }
}

/// Convert a color value into RGB channels, falling back to mid-gray
pub fn normalize_color(value: &Value) -> Rgb {
    let color = match value {
        Value::Object(map) => channels(map).or_else(|| {
            map.get("value")
                .and_then(Value::as_str)
                .and_then(Rgb::from_hex)
        }),
        Value::String(s) => Rgb::from_hex(s),
        _ => None,
    };
    color.unwrap_or_else(|| {
        debug!(%value, "unrecognized color, using mid-gray");
        Rgb::MID_GRAY
    })
}

fn channels(map: &Map<String, Value>) -> Option<Rgb> {
    let channel = |key: &str| map.get(key).and_then(Value::as_f64);
    Some(Rgb::new(channel("r")?, channel("g")?, channel("b")?))
}

/// Normalize a list of paint entries
pub fn to_paints(values: &[Value]) -> Vec<Paint> {
    values.iter().map(to_paint).collect()
}
