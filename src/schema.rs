//! Schema Module
//!
//! Typed view of the declarative component tree handed to the compiler.
//! Values that may carry expressions or functions stay as `serde_json::Value`
//! and are classified lazily by the text classifier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// NODE KINDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Page,
    Block,
    Component,
    Div,
    Text,
    Image,
}

impl NodeKind {
    /// Case-insensitive lookup of a `componentName`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "page" => Some(NodeKind::Page),
            "block" => Some(NodeKind::Block),
            "component" => Some(NodeKind::Component),
            "div" => Some(NodeKind::Div),
            "text" => Some(NodeKind::Text),
            "image" => Some(NodeKind::Image),
            _ => None,
        }
    }

    /// Container kinds become standalone generated components.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Page | NodeKind::Block | NodeKind::Component)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Page => "Page",
            NodeKind::Block => "Block",
            NodeKind::Component => "Component",
            NodeKind::Div => "Div",
            NodeKind::Text => "Text",
            NodeKind::Image => "Image",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCHEMA TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    pub component_name: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<SchemaNode>,
    #[serde(default)]
    pub style: Option<Map<String, Value>>,
    #[serde(default, rename = "loop")]
    pub loop_source: Option<Value>,
    #[serde(default)]
    pub loop_args: Option<Vec<String>>,
    #[serde(default)]
    pub condition: Option<Value>,
    #[serde(default)]
    pub data_source: Option<DataSourceField>,
    /// Root component name override; only read on the root node.
    #[serde(default)]
    pub my_component_name: Option<String>,
}

impl SchemaNode {
    pub fn new(component_name: &str) -> Self {
        SchemaNode {
            component_name: component_name.to_string(),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_name(&self.component_name)
    }

    pub fn class_name(&self) -> Option<&str> {
        self.props.get("className").and_then(Value::as_str)
    }

    /// Style attached to this node's class: `props.style`, then node-level `style`.
    pub fn class_style(&self) -> Map<String, Value> {
        if let Some(Value::Object(style)) = self.props.get("style") {
            return style.clone();
        }
        self.style.clone().unwrap_or_default()
    }

    pub fn has_directives(&self) -> bool {
        self.loop_source.is_some() || self.condition.is_some()
    }

    pub fn data_sources(&self) -> &[DataSourceDescriptor] {
        match &self.data_source {
            Some(DataSourceField::One(descriptor)) => std::slice::from_ref(descriptor),
            Some(DataSourceField::Many(list)) => list,
            None => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DataSourceField {
    One(DataSourceDescriptor),
    Many(Vec<DataSourceDescriptor>),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Fetch,
    Jsonp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DataSourceKind,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub data_handler: Option<Value>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE PATHS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Child(usize),
    Field(String),
}

/// Location of a node or value inside the schema, rendered as `$.children[0].props.onClick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root() -> Self {
        NodePath::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Child(index));
        NodePath { segments }
    }

    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.to_string()));
        NodePath { segments }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                Segment::Child(index) => write!(f, ".children[{}]", index)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test_log::test]
    fn test_kind_lookup_is_case_insensitive() {
        assert_eq!(NodeKind::from_name("Page"), Some(NodeKind::Page));
        assert_eq!(NodeKind::from_name("TEXT"), Some(NodeKind::Text));
        assert_eq!(NodeKind::from_name("video"), None);
        assert!(NodeKind::Block.is_container());
        assert!(!NodeKind::Div.is_container());
    }

    #[test_log::test]
    fn test_deserialize_node() {
        let node: SchemaNode = serde_json::from_value(json!({
            "componentName": "Block",
            "props": { "className": "card", "style": { "fontSize": "32px" } },
            "loop": "{{ items }}",
            "loopArgs": ["row", "i"],
            "dataSource": { "id": "load", "type": "fetch", "options": { "uri": "/api" } },
            "children": [{ "componentName": "Text", "props": { "text": "hi" } }]
        }))
        .unwrap();

        assert_eq!(node.kind(), Some(NodeKind::Block));
        assert_eq!(node.class_name(), Some("card"));
        assert_eq!(node.class_style().get("fontSize"), Some(&json!("32px")));
        assert_eq!(node.loop_source, Some(json!("{{ items }}")));
        assert_eq!(node.data_sources().len(), 1);
        assert_eq!(node.data_sources()[0].kind, DataSourceKind::Fetch);
        assert_eq!(node.children.len(), 1);
    }

    #[test_log::test]
    fn test_class_style_falls_back_to_node_style() {
        let node: SchemaNode = serde_json::from_value(json!({
            "componentName": "Div",
            "props": { "className": "box" },
            "style": { "color": "red" }
        }))
        .unwrap();
        assert_eq!(node.class_style().get("color"), Some(&json!("red")));
    }

    #[test_log::test]
    fn test_path_display() {
        let path = NodePath::root().child(0).child(2).field("props").field("onClick");
        assert_eq!(path.to_string(), "$.children[0].children[2].props.onClick");
        assert_eq!(NodePath::root().to_string(), "$");
    }
}
