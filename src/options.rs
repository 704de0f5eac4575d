use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::style::DEFAULT_VIEWPORT_WIDTH;

fn default_width() -> f64 {
    DEFAULT_VIEWPORT_WIDTH
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveOptions {
    /// Reference viewport width; `1vw = width / 100`.
    #[serde(default = "default_width")]
    pub width: f64,
}

impl Default for ResponsiveOptions {
    fn default() -> Self {
        ResponsiveOptions {
            width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default)]
    pub responsive: ResponsiveOptions,
    /// Utility functions declared ahead of the generated components.
    #[serde(default)]
    pub utils: Map<String, Value>,
    /// Explicit root component name; wins over the schema's `myComponentName`.
    #[serde(default)]
    pub component_name: Option<String>,
    /// Report unsupported nodes in the output instead of failing.
    #[serde(default)]
    pub skip_unsupported: bool,
}

impl CompileOptions {
    pub fn with_component_name(mut self, name: &str) -> Self {
        self.component_name = Some(name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test_log::test]
    fn test_defaults() {
        let options: CompileOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options.responsive.width, 750.0);
        assert!(options.utils.is_empty());
        assert_eq!(options.component_name, None);
        assert!(!options.skip_unsupported);
    }

    #[test_log::test]
    fn test_camel_case_fields() {
        let options: CompileOptions = serde_json::from_value(json!({
            "responsive": { "width": 375 },
            "utils": { "fmt": "(v) => v" },
            "componentName": "Card",
            "skipUnsupported": true
        }))
        .unwrap();
        assert_eq!(options.responsive.width, 375.0);
        assert_eq!(options.utils.len(), 1);
        assert_eq!(options.component_name.as_deref(), Some("Card"));
        assert!(options.skip_unsupported);
    }
}
