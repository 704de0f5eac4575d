//! Render Generator
//!
//! Emits the markup fragment for a single schema node.

use serde_json::Value;

use crate::classify::{to_source, Position};
use crate::context::GenerationContext;
use crate::directives::{wrap_condition, wrap_loop};
use crate::schema::{NodeKind, NodePath, SchemaNode};
use crate::transform::transform_children;
use crate::validate::CompileError;

const RESERVED_PROPS: [&str; 4] = ["className", "style", "text", "src"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedKind(String),
}

/// Result of rendering one node: markup, or an explicit reason it produced none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(String),
    Skipped(SkipReason),
}

fn class_attribute(node: &SchemaNode) -> String {
    match node.class_name() {
        Some(class_name) => format!(" className={{styles.{}}}", class_name),
        None => String::new(),
    }
}

fn prop_attributes(node: &SchemaNode, path: &NodePath) -> Result<String, CompileError> {
    let props_path = path.field("props");
    let mut attributes = String::new();
    for (key, value) in &node.props {
        if RESERVED_PROPS.contains(&key.as_str()) {
            continue;
        }
        let source = to_source(value, Position::Attribute, &props_path.field(key))?;
        attributes.push_str(&format!(" {}={{{}}}", key, source));
    }
    Ok(attributes)
}

fn prop_or_null<'a>(node: &'a SchemaNode, key: &str) -> &'a Value {
    node.props.get(key).unwrap_or(&Value::Null)
}

pub fn render_node(
    ctx: &mut GenerationContext,
    node: &SchemaNode,
    path: &NodePath,
) -> Result<RenderOutcome, CompileError> {
    let Some(kind) = node.kind() else {
        return Ok(RenderOutcome::Skipped(SkipReason::UnsupportedKind(
            node.component_name.clone(),
        )));
    };

    let class = class_attribute(node);
    let attributes = prop_attributes(node, path)?;
    let props_path = path.field("props");

    let mut markup = match kind {
        NodeKind::Text => {
            let text = match node.props.get("text") {
                Some(value) => to_source(value, Position::InlineContent, &props_path.field("text"))?,
                None => String::new(),
            };
            format!("<span{}{}>{}</span>", class, attributes, text)
        }
        NodeKind::Image => {
            let src = to_source(prop_or_null(node, "src"), Position::Attribute, &props_path.field("src"))?;
            format!("<img{}{} src={{{}}} alt='' />", class, attributes, src)
        }
        NodeKind::Page | NodeKind::Block | NodeKind::Component | NodeKind::Div => {
            if node.children.is_empty() {
                format!("<div{}{} />", class, attributes)
            } else {
                let children = transform_children(ctx, &node.children, path)?;
                format!("<div{}{}>{}</div>", class, attributes, children)
            }
        }
    };

    if let Some(loop_source) = &node.loop_source {
        markup = wrap_loop(
            loop_source,
            node.loop_args.as_deref(),
            &markup,
            &path.field("loop"),
        )?;
    }
    if let Some(condition) = &node.condition {
        markup = wrap_condition(condition, &markup, &path.field("condition"))?;
    }

    Ok(RenderOutcome::Rendered(markup))
}

/// Place a node's fragment among element children. Loop and condition
/// fragments are expressions there and need one brace layer; in a render
/// section they stand bare.
pub fn embed_child(node: &SchemaNode, fragment: String) -> String {
    if node.has_directives() && !fragment.is_empty() {
        format!("{{{}}}", fragment)
    } else {
        fragment
    }
}
