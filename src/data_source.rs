//! Data-Source Compiler
//!
//! Turns an async data descriptor into method source that calls `fetch` or
//! `jsonp`, registering the matching import on the context.

use serde_json::{Map, Value};

use crate::classify::{
    classify, expression_body, function_parts, serialize_value, to_source, Position, ValueClass,
};
use crate::context::GenerationContext;
use crate::schema::{DataSourceDescriptor, DataSourceKind, NodePath};
use crate::validate::CompileError;

pub const FETCH_IMPORT: &str = "import { fetch } from 'whatwg-fetch';";
pub const JSONP_IMPORT: &str = "import jsonp from 'fetch-jsonp';";

const RESERVED_OPTIONS: [&str; 3] = ["uri", "method", "params"];

impl DataSourceKind {
    fn action(self) -> &'static str {
        match self {
            DataSourceKind::Fetch => "fetch",
            DataSourceKind::Jsonp => "jsonp",
        }
    }

    fn import_line(self) -> &'static str {
        match self {
            DataSourceKind::Fetch => FETCH_IMPORT,
            DataSourceKind::Jsonp => JSONP_IMPORT,
        }
    }
}

/// Request payload source. `params` is spliced in as text because it may be
/// an expression that has no value form.
fn payload_source(descriptor: &DataSourceDescriptor) -> String {
    let mut payload = Map::new();
    if descriptor.kind == DataSourceKind::Fetch {
        if let Some(method) = descriptor.options.get("method") {
            payload.insert("method".to_string(), method.clone());
        }
    }
    for (key, value) in &descriptor.options {
        if !RESERVED_OPTIONS.contains(&key.as_str()) {
            payload.insert(key.clone(), value.clone());
        }
    }

    let serialized = serialize_value(&Value::Object(payload.clone()));
    let Some(params) = descriptor.options.get("params") else {
        return serialized;
    };

    let body = match params {
        Value::String(text) => match expression_body(text) {
            Some(expr) => expr.to_string(),
            None => serialize_value(params),
        },
        other => serialize_value(other),
    };
    let head = &serialized[..serialized.len() - 1];
    let separator = if payload.is_empty() { "" } else { "," };
    format!("{}{}\"body\":{}}}", head, separator, body)
}

pub fn compile_data_source(
    ctx: &mut GenerationContext,
    descriptor: &DataSourceDescriptor,
    path: &NodePath,
) -> Result<String, CompileError> {
    let kind = descriptor.kind;
    if ctx.imports.register(kind.import_line()) {
        log::debug!("registered `{}` import for data source `{}`", kind.action(), descriptor.id);
    }

    let options_path = path.field("options");
    let uri = descriptor.options.get("uri").cloned().unwrap_or(Value::Null);
    let uri = to_source(&uri, Position::Attribute, &options_path.field("uri"))?;

    let mut method = format!(
        "{}() {{\n  {}({}, {})\n    .then((response) => response.json())",
        descriptor.id,
        kind.action(),
        uri,
        payload_source(descriptor)
    );

    if let Some(handler) = &descriptor.data_handler {
        let handler_path = path.field("dataHandler");
        let source = match classify(handler) {
            ValueClass::Function(source) | ValueClass::Literal(source) | ValueClass::Expression(source) => source,
            ValueClass::Data(_) => "",
        };
        let parts = function_parts(source, &handler_path)?;
        method.push_str(&format!(
            "\n    .then({}({}) => {{{}}})\n    .catch((e) => {{\n      console.log('error', e);\n    }});",
            parts.async_prefix(),
            parts.params,
            parts.body
        ));
    }

    method.push_str("\n}");
    Ok(method)
}
