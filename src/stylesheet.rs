//! Nested Stylesheet
//!
//! Records the nesting of classed nodes while the walk runs and renders one
//! nested rule block per class against the final style registry, so blocks
//! always agree with the `style.js` panel.

use crate::schema::{NodePath, SchemaNode};
use crate::style::{camel_to_hyphen, declaration_value, StyleRegistry};
use crate::visitor::NodeVisitor;

#[derive(Debug, Clone, Default, PartialEq)]
struct RuleBlock {
    class_name: String,
    children: Vec<RuleBlock>,
}

#[derive(Debug, Clone, Default)]
pub struct StylesheetCollector {
    roots: Vec<RuleBlock>,
    open: Vec<RuleBlock>,
}

impl StylesheetCollector {
    pub fn new() -> Self {
        StylesheetCollector::default()
    }

    pub fn render(&self, registry: &StyleRegistry) -> String {
        let mut out = String::new();
        for block in &self.roots {
            render_block(block, registry, &mut out);
        }
        out
    }
}

fn render_block(block: &RuleBlock, registry: &StyleRegistry, out: &mut String) {
    out.push_str(&format!(".{} {{", block.class_name));
    if let Some(style) = registry.get(&block.class_name) {
        for (property, value) in style {
            out.push_str(&format!(
                "{}: {};\n",
                camel_to_hyphen(property),
                declaration_value(value)
            ));
        }
    }
    for child in &block.children {
        render_block(child, registry, out);
    }
    out.push('}');
}

impl NodeVisitor for StylesheetCollector {
    fn enter(&mut self, node: &SchemaNode, _path: &NodePath) {
        if let Some(class_name) = node.class_name() {
            self.open.push(RuleBlock {
                class_name: class_name.to_string(),
                children: Vec::new(),
            });
        }
    }

    fn leave(&mut self, node: &SchemaNode, _path: &NodePath) {
        if node.class_name().is_none() {
            return;
        }
        let Some(block) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(block),
            None => self.roots.push(block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn node(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test_log::test]
    fn test_single_block() {
        let card = node(json!({
            "componentName": "Block",
            "props": { "className": "card", "style": { "fontSize": "32px" } }
        }));
        let mut registry = StyleRegistry::new();
        let mut sheet = StylesheetCollector::new();
        let path = NodePath::root();

        registry.enter(&card, &path);
        sheet.enter(&card, &path);
        sheet.leave(&card, &path);

        assert_eq!(sheet.render(&registry), ".card {font-size: 32px;\n}");
    }

    #[test_log::test]
    fn test_nesting_skips_unclassed_nodes() {
        let outer = node(json!({ "componentName": "Div", "props": { "className": "outer", "style": { "display": "flex" } } }));
        let plain = node(json!({ "componentName": "Div" }));
        let inner = node(json!({ "componentName": "Text", "props": { "className": "inner", "style": { "lineHeight": 2 } } }));

        let mut registry = StyleRegistry::new();
        let mut sheet = StylesheetCollector::new();
        let path = NodePath::root();
        for n in [&outer, &plain, &inner] {
            registry.enter(n, &path);
            sheet.enter(n, &path);
        }
        for n in [&inner, &plain, &outer] {
            sheet.leave(n, &path);
        }

        assert_eq!(
            sheet.render(&registry),
            ".outer {display: flex;\n.inner {line-height: 2;\n}}"
        );
    }
}
