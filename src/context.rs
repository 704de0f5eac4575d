//! Generation Context
//!
//! All state shared by one compilation. Created per request, threaded through
//! every walker and generator call, consumed once by panel emission.

use crate::schema::{NodePath, SchemaNode};
use crate::style::StyleRegistry;
use crate::stylesheet::StylesheetCollector;
use crate::validate::SkippedNode;
use crate::visitor::NodeVisitor;

/// Insertion-ordered import lines; registering an existing line is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    lines: Vec<String>,
}

impl ImportSet {
    /// Returns `true` when the line was not yet present.
    pub fn register(&mut self, line: &str) -> bool {
        if self.lines.iter().any(|existing| existing == line) {
            return false;
        }
        self.lines.push(line.to_string());
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    pub name: String,
    pub source: String,
}

#[derive(Debug)]
pub struct GenerationContext {
    pub imports: ImportSet,
    pub styles: StyleRegistry,
    pub stylesheet: StylesheetCollector,
    pub utils: Vec<String>,
    /// Generated components in pre-order of their container nodes.
    pub components: Vec<ComponentDefinition>,
    /// Compiled data-source methods, kept apart from component bodies.
    pub data_methods: Vec<String>,
    pub skipped: Vec<SkippedNode>,
    pub root_name: String,
    pub skip_unsupported: bool,
}

impl GenerationContext {
    pub fn new(root_name: &str) -> Self {
        GenerationContext {
            imports: ImportSet::default(),
            styles: StyleRegistry::new(),
            stylesheet: StylesheetCollector::new(),
            utils: Vec::new(),
            components: Vec::new(),
            data_methods: Vec::new(),
            skipped: Vec::new(),
            root_name: root_name.to_string(),
            skip_unsupported: false,
        }
    }

    pub fn add_util(&mut self, name: &str, source: &str) {
        self.utils.push(format!("const {} = {}", name, source.trim()));
    }

    /// Reserve the next component slot so definitions keep pre-order even
    /// though a parent's body is finished after its children.
    pub fn reserve_component(&mut self, kind_name: &str) -> usize {
        let name = if self.components.is_empty() {
            self.root_name.clone()
        } else {
            format!("{}{}{}", self.root_name, kind_name, self.components.len())
        };
        self.components.push(ComponentDefinition {
            name,
            source: String::new(),
        });
        self.components.len() - 1
    }

    pub fn enter(&mut self, node: &SchemaNode, path: &NodePath) {
        self.styles.enter(node, path);
        self.stylesheet.enter(node, path);
    }

    pub fn leave(&mut self, node: &SchemaNode, path: &NodePath) {
        self.styles.leave(node, path);
        self.stylesheet.leave(node, path);
    }

    pub fn nested_stylesheet(&self) -> String {
        self.stylesheet.render(&self.styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn test_import_registration_is_idempotent() {
        let mut imports = ImportSet::default();
        assert!(imports.register("import a from 'a'"));
        assert!(!imports.register("import a from 'a'"));
        assert!(imports.register("import b from 'b'"));
        assert_eq!(imports.len(), 2);
        assert_eq!(imports.lines()[1], "import b from 'b'");
    }

    #[test_log::test]
    fn test_component_names() {
        let mut ctx = GenerationContext::new("Home");
        assert_eq!(ctx.reserve_component("Page"), 0);
        assert_eq!(ctx.reserve_component("Block"), 1);
        assert_eq!(ctx.components[0].name, "Home");
        assert_eq!(ctx.components[1].name, "HomeBlock1");
    }

    #[test_log::test]
    fn test_utils_are_declared_as_consts() {
        let mut ctx = GenerationContext::new("Home");
        ctx.add_util("format", " (v) => v.toFixed(2) ");
        assert_eq!(ctx.utils, vec!["const format = (v) => v.toFixed(2)".to_string()]);
    }
}
