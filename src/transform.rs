//! Transform Engine
//!
//! The single recursive walk over the schema. Container nodes become generated
//! component definitions on the context; every other node returns its markup
//! to the enclosing container's render section.

use crate::context::GenerationContext;
use crate::data_source::compile_data_source;
use crate::render::{embed_child, render_node, RenderOutcome, SkipReason};
use crate::schema::{NodePath, SchemaNode};
use crate::validate::{CompileError, SkippedNode};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT TEMPLATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Reserved extension points of a generated component, always empty for now.
#[derive(Debug, Default)]
struct ComponentSections {
    states: Vec<String>,
    lifecycles: Vec<String>,
    methods: Vec<String>,
}

fn component_source(name: &str, render: &str) -> String {
    let sections = ComponentSections::default();
    let mut lines = vec![format!(
        "const {}:React.FC<{}Props> = ({{}}) => {{\n const [state, setState] = useState([])",
        name, name
    )];
    lines.extend(sections.states);
    lines.extend(sections.lifecycles);
    lines.extend(sections.methods);
    lines.push("return (".to_string());
    lines.push(render.to_string());
    lines.push(")".to_string());
    lines.push("}".to_string());
    lines.join("\n")
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALK
// ═══════════════════════════════════════════════════════════════════════════════

fn skip_or_fail(
    ctx: &mut GenerationContext,
    node: &SchemaNode,
    path: &NodePath,
    reason: SkipReason,
) -> Result<String, CompileError> {
    let SkipReason::UnsupportedKind(kind) = reason;
    if !ctx.skip_unsupported {
        return Err(CompileError::UnsupportedNodeKind {
            kind,
            path: path.clone(),
        });
    }
    log::warn!("skipping node with unsupported kind `{}` at {}", kind, path);
    ctx.skipped.push(SkippedNode {
        path: path.clone(),
        component_name: node.component_name.clone(),
    });
    Ok(String::new())
}

fn render_markup(
    ctx: &mut GenerationContext,
    node: &SchemaNode,
    path: &NodePath,
) -> Result<String, CompileError> {
    match render_node(ctx, node, path)? {
        RenderOutcome::Rendered(markup) => Ok(markup),
        RenderOutcome::Skipped(reason) => skip_or_fail(ctx, node, path, reason),
    }
}

fn emit_container(
    ctx: &mut GenerationContext,
    node: &SchemaNode,
    path: &NodePath,
    kind_name: &str,
) -> Result<(), CompileError> {
    let slot = ctx.reserve_component(kind_name);

    let data_path = path.field("dataSource");
    for (index, descriptor) in node.data_sources().iter().enumerate() {
        let method = compile_data_source(ctx, descriptor, &data_path.field(&index.to_string()))?;
        ctx.data_methods.push(method);
    }

    let render = render_markup(ctx, node, path)?;
    let name = ctx.components[slot].name.clone();
    log::debug!("generated component `{}` for {}", name, path);
    ctx.components[slot].source = component_source(&name, &render);
    Ok(())
}

/// Visit one node. Containers contribute an empty fragment and append a
/// component definition instead.
pub fn transform_node(
    ctx: &mut GenerationContext,
    node: &SchemaNode,
    path: &NodePath,
) -> Result<String, CompileError> {
    log::trace!("visiting `{}` at {}", node.component_name, path);
    ctx.enter(node, path);

    let fragment = match node.kind() {
        Some(kind) if kind.is_container() => {
            emit_container(ctx, node, path, kind.display_name())?;
            String::new()
        }
        _ => render_markup(ctx, node, path)?,
    };

    ctx.leave(node, path);
    Ok(fragment)
}

/// Concatenate the fragments of a sibling list.
pub fn transform_children(
    ctx: &mut GenerationContext,
    children: &[SchemaNode],
    parent: &NodePath,
) -> Result<String, CompileError> {
    let mut out = String::new();
    for (index, child) in children.iter().enumerate() {
        let fragment = transform_node(ctx, child, &parent.child(index))?;
        out.push_str(&embed_child(child, fragment));
    }
    Ok(out)
}

/// Walk the whole schema. A non-container root is wrapped into the root
/// component so the generated module always has a default export.
pub fn transform_schema(ctx: &mut GenerationContext, schema: &SchemaNode) -> Result<(), CompileError> {
    let root = NodePath::root();
    let is_container = schema.kind().is_some_and(|kind| kind.is_container());
    if is_container {
        transform_node(ctx, schema, &root)?;
        return Ok(());
    }

    let slot = ctx.reserve_component("");
    let fragment = transform_node(ctx, schema, &root)?;
    let name = ctx.components[slot].name.clone();
    ctx.components[slot].source = component_source(&name, &fragment);
    Ok(())
}
