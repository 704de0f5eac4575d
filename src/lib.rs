//! # Schema Compiler Native
//!
//! Compiles a declarative component schema into four panels:
//!
//! 1. `index.tsx` - React function components, one per container node
//! 2. `style.js` - the class-name keyed style registry
//! 3. `style.less` - nested stylesheet mirroring the schema tree
//! 4. `style.responsive.js` - the registry with sizes rewritten to `vw`
//!
//! ## Walk Invariants
//!
//! 1. **One Walk**: `transform::transform_node` is the only recursion over the
//!    schema. Style registry and stylesheet collection are visitors on it.
//! 2. **Explicit Context**: all per-compilation state lives in
//!    `GenerationContext`; nothing is global except compiled regexes.
//! 3. **No Silent Drops**: an unrecognized `componentName` is an error, or a
//!    reported skip when `skipUnsupported` is set.
//! 4. **Order**: imports are first-wins, styles are last-write-wins, generated
//!    components follow pre-order of their container nodes.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod classify;
mod codegen;
mod context;
mod data_source;
mod directives;
mod format;
mod function;
mod options;
mod render;
mod schema;
mod style;
mod stylesheet;
mod transform;
mod validate;
mod visitor;


pub use classify::{classify, serialize_value, to_source, Position, ValueClass};
pub use codegen::{
    compile_json, compile_schema, CompileOutput, Panel, INDEX_PANEL, RESPONSIVE_PANEL,
    STYLESHEET_PANEL, STYLE_PANEL,
};
pub use context::{ComponentDefinition, GenerationContext, ImportSet};
pub use data_source::compile_data_source;
pub use directives::{wrap_condition, wrap_loop};
pub use format::{format_stylesheet, Dialect, OxcFormatter, SourceFormatter};
pub use function::{decompose_function, FunctionParts};
pub use options::{CompileOptions, ResponsiveOptions};
pub use render::{render_node, RenderOutcome, SkipReason};
pub use schema::{DataSourceDescriptor, DataSourceField, DataSourceKind, NodeKind, NodePath, SchemaNode};
pub use style::{camel_to_hyphen, convert_to_responsive_units, StyleRegistry, DEFAULT_VIEWPORT_WIDTH};
pub use stylesheet::StylesheetCollector;
pub use transform::{transform_children, transform_node, transform_schema};
pub use validate::*;
pub use visitor::NodeVisitor;

/// Node entry point: compile with the built-in Oxc formatter.
#[cfg(feature = "napi")]
#[napi]
pub fn compile_schema_native(
    schema: serde_json::Value,
    options: Option<serde_json::Value>,
) -> napi::Result<serde_json::Value> {
    let schema: SchemaNode = serde_json::from_value(schema)
        .map_err(|e| napi::Error::from_reason(format!("[{}] {}", ERR_SCHEMA_JSON, e)))?;
    let options: CompileOptions = match options {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| napi::Error::from_reason(format!("[{}] {}", ERR_SCHEMA_JSON, e)))?,
        None => CompileOptions::default(),
    };
    let output = compile_schema(&schema, &options, &OxcFormatter)
        .map_err(|e| napi::Error::from_reason(format!("[{}] {} ({})", e.code(), e, e.hint())))?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}
