use crate::schema::{NodePath, SchemaNode};
use crate::style::StyleRegistry;

/// Observers of the single schema walk.
///
/// Rules:
/// 1. The transform engine is the only place that recurses over the tree.
/// 2. `enter` fires before a node's markup is generated, `leave` after its
///    children have been visited.
/// 3. Every visitor sees the same nodes in the same order.
pub trait NodeVisitor {
    fn enter(&mut self, _node: &SchemaNode, _path: &NodePath) {}

    fn leave(&mut self, _node: &SchemaNode, _path: &NodePath) {}
}

impl NodeVisitor for StyleRegistry {
    fn enter(&mut self, node: &SchemaNode, _path: &NodePath) {
        if let Some(class_name) = node.class_name() {
            self.register(class_name, node.class_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test_log::test]
    fn test_style_registry_collects_on_enter() {
        let node: SchemaNode = serde_json::from_value(json!({
            "componentName": "Text",
            "props": { "className": "title", "style": { "fontWeight": "bold" } }
        }))
        .unwrap();

        let mut registry = StyleRegistry::new();
        registry.enter(&node, &NodePath::root());
        registry.leave(&node, &NodePath::root());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("title").unwrap().get("fontWeight"), Some(&json!("bold")));
    }

    #[test_log::test]
    fn test_unclassed_nodes_are_ignored() {
        let mut registry = StyleRegistry::new();
        registry.enter(&SchemaNode::new("Div"), &NodePath::root());
        assert!(registry.is_empty());
    }
}
