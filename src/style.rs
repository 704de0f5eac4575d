//! Style Registry & Responsive Units
//!
//! Class-name keyed style tables collected during the walk, plus the px → vw
//! rewrite used for the responsive variant.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::classify::serialize_value;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 750.0;

lazy_static! {
    static ref PIXEL_RE: Regex = Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*(px)?\s*$").unwrap();
    static ref CAMEL_BOUNDARY_RE: Regex = Regex::new(r"([A-Z])").unwrap();

    /// Size, position and radius properties rewritten to viewport units.
    static ref RESPONSIVE_PROPERTIES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("fontSize");
        s.insert("marginTop");
        s.insert("marginBottom");
        s.insert("marginLeft");
        s.insert("marginRight");
        s.insert("paddingTop");
        s.insert("paddingBottom");
        s.insert("paddingLeft");
        s.insert("paddingRight");
        s.insert("top");
        s.insert("bottom");
        s.insert("left");
        s.insert("right");
        s.insert("width");
        s.insert("height");
        s.insert("maxWidth");
        s.insert("lineHeight");
        s.insert("borderRadius");
        s.insert("borderTopLeftRadius");
        s.insert("borderTopRightRadius");
        s.insert("borderBottomLeftRadius");
        s.insert("borderBottomRightRadius");
        s
    };
}

/// Ordered `className -> style` table. Re-registering a class replaces its
/// style but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRegistry {
    entries: Map<String, Value>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        StyleRegistry::default()
    }

    pub fn register(&mut self, class_name: &str, style: Map<String, Value>) {
        if self.entries.contains_key(class_name) {
            log::debug!("style for class `{}` overwritten", class_name);
        }
        self.entries.insert(class_name.to_string(), Value::Object(style));
    }

    pub fn get(&self, class_name: &str) -> Option<&Map<String, Value>> {
        self.entries.get(class_name).and_then(Value::as_object)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Object-literal source text of the whole registry.
    pub fn to_source(&self) -> String {
        serialize_value(&Value::Object(self.entries.clone()))
    }
}

/// `flexDirection` -> `flex-direction`
pub fn camel_to_hyphen(name: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(name, "-$1")
        .trim_start_matches('-')
        .to_lowercase()
}

/// Stylesheet text for a declaration value.
pub fn declaration_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Properties whose unitless values are multipliers, not pixels.
const UNITLESS_MULTIPLIERS: [&str; 1] = ["lineHeight"];

fn pixel_value(property: &str, value: &Value) -> Option<f64> {
    let unit_required = UNITLESS_MULTIPLIERS.contains(&property);
    match value {
        Value::Number(n) if !unit_required => n.as_f64(),
        Value::String(text) => {
            let caps = PIXEL_RE.captures(text)?;
            if unit_required && caps.get(2).is_none() {
                return None;
            }
            caps.get(1).and_then(|m| m.as_str().parse().ok())
        }
        _ => None,
    }
}

/// Convert a single pixel value to `vw` for the given reference width.
pub fn to_viewport_units(pixels: f64, viewport_width: f64) -> String {
    let width = if viewport_width.is_finite() && viewport_width > 0.0 {
        viewport_width
    } else {
        DEFAULT_VIEWPORT_WIDTH
    };
    format!("{:.2}vw", pixels / (width / 100.0))
}

/// Rewrite responsive properties of every class to viewport units, in place.
pub fn convert_to_responsive_units(registry: &mut StyleRegistry, viewport_width: f64) {
    for style in registry.entries.values_mut() {
        let Some(style) = style.as_object_mut() else {
            continue;
        };
        for (property, value) in style.iter_mut() {
            if !RESPONSIVE_PROPERTIES.contains(property.as_str()) {
                continue;
            }
            if let Some(pixels) = pixel_value(property, value) {
                *value = Value::String(to_viewport_units(pixels, viewport_width));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn style(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test_log::test]
    fn test_camel_to_hyphen() {
        assert_eq!(camel_to_hyphen("flexDirection"), "flex-direction");
        assert_eq!(camel_to_hyphen("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(camel_to_hyphen("color"), "color");
    }

    #[test_log::test]
    fn test_register_last_write_wins_keeps_position() {
        let mut registry = StyleRegistry::new();
        registry.register("a", style(json!({ "color": "red" })));
        registry.register("b", style(json!({ "color": "blue" })));
        registry.register("a", style(json!({ "color": "green" })));

        assert_eq!(registry.class_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().get("color"), Some(&json!("green")));
        assert_eq!(
            registry.to_source(),
            "{\"a\":{\"color\":\"green\"},\"b\":{\"color\":\"blue\"}}"
        );
    }

    #[test_log::test]
    fn test_responsive_conversion() {
        let mut registry = StyleRegistry::new();
        registry.register(
            "card",
            style(json!({
                "fontSize": "32px",
                "width": 375,
                "marginTop": "-15px",
                "height": "100%",
                "color": "#333",
                "lineHeight": "1.5"
            })),
        );
        convert_to_responsive_units(&mut registry, DEFAULT_VIEWPORT_WIDTH);

        let card = registry.get("card").unwrap();
        assert_eq!(card.get("fontSize"), Some(&json!("4.27vw")));
        assert_eq!(card.get("width"), Some(&json!("50.00vw")));
        assert_eq!(card.get("marginTop"), Some(&json!("-2.00vw")));
        assert_eq!(card.get("height"), Some(&json!("100%")));
        assert_eq!(card.get("color"), Some(&json!("#333")));
        assert_eq!(card.get("lineHeight"), Some(&json!("1.5")));
    }

    #[test_log::test]
    fn test_line_height_needs_explicit_pixels() {
        let mut registry = StyleRegistry::new();
        registry.register("a", style(json!({ "lineHeight": "45px" })));
        registry.register("b", style(json!({ "lineHeight": 2 })));
        registry.register("c", style(json!({ "lineHeight": "1.2" })));
        convert_to_responsive_units(&mut registry, DEFAULT_VIEWPORT_WIDTH);

        assert_eq!(registry.get("a").unwrap().get("lineHeight"), Some(&json!("6.00vw")));
        assert_eq!(registry.get("b").unwrap().get("lineHeight"), Some(&json!(2)));
        assert_eq!(registry.get("c").unwrap().get("lineHeight"), Some(&json!("1.2")));
    }

    #[test_log::test]
    fn test_conversion_is_pure_per_width() {
        let mut base = StyleRegistry::new();
        base.register("box", style(json!({ "width": "30px", "paddingLeft": "60px" })));

        let mut first = base.clone();
        let mut second = base.clone();
        convert_to_responsive_units(&mut first, 750.0);
        convert_to_responsive_units(&mut second, 750.0);
        assert_eq!(first, second);

        let mut doubled = base.clone();
        convert_to_responsive_units(&mut doubled, 1500.0);
        assert_eq!(first.get("box").unwrap().get("width"), Some(&json!("4.00vw")));
        assert_eq!(doubled.get("box").unwrap().get("width"), Some(&json!("2.00vw")));
        assert_eq!(doubled.get("box").unwrap().get("paddingLeft"), Some(&json!("4.00vw")));
    }

    #[test_log::test]
    fn test_invalid_width_falls_back_to_default() {
        assert_eq!(to_viewport_units(75.0, 0.0), "10.00vw");
        assert_eq!(to_viewport_units(75.0, f64::NAN), "10.00vw");
    }
}
