//! Loop & Condition Wrapping
//!
//! Wraps a rendered markup fragment in `list.map(...)` or `cond && ...` source.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::classify::{expression_body, serialize_value, to_source, Position};
use crate::schema::NodePath;
use crate::validate::CompileError;

lazy_static! {
    static ref OPENING_TAG_RE: Regex = Regex::new(r"^\s*<[A-Za-z][\w.:-]*").unwrap();
    static ref THIS_QUALIFIER_RE: Regex = Regex::new(r"\bthis\.").unwrap();
}

pub const DEFAULT_ITEM_NAME: &str = "item";
pub const DEFAULT_INDEX_NAME: &str = "index";

/// `(itemName, indexName)` with empty or missing names replaced by defaults.
pub fn loop_bindings(loop_args: Option<&[String]>) -> (String, String) {
    let pick = |index: usize, default: &str| {
        loop_args
            .and_then(|args| args.get(index))
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    (pick(0, DEFAULT_ITEM_NAME), pick(1, DEFAULT_INDEX_NAME))
}

fn loop_source_text(loop_source: &Value, path: &NodePath) -> Result<String, CompileError> {
    match loop_source {
        Value::Array(_) => Ok(serialize_value(loop_source)),
        Value::String(text) => expression_body(text)
            .map(str::to_string)
            .ok_or_else(|| CompileError::InvalidLoopSource { path: path.clone() }),
        _ => Err(CompileError::InvalidLoopSource { path: path.clone() }),
    }
}

fn strip_this(source: &str) -> String {
    THIS_QUALIFIER_RE.replace_all(source, "").into_owned()
}

/// Insert ` key={index}` right after the first element's tag name.
fn inject_key(fragment: &str, index_name: &str, path: &NodePath) -> Result<String, CompileError> {
    let tag_end = OPENING_TAG_RE
        .find(fragment)
        .map(|m| m.end())
        .ok_or_else(|| CompileError::MalformedLoopTarget {
            path: path.clone(),
            fragment: fragment.to_string(),
        })?;
    Ok(format!(
        "{} key={{{}}}{}",
        &fragment[..tag_end],
        index_name,
        &fragment[tag_end..]
    ))
}

pub fn wrap_loop(
    loop_source: &Value,
    loop_args: Option<&[String]>,
    fragment: &str,
    path: &NodePath,
) -> Result<String, CompileError> {
    let (item_name, index_name) = loop_bindings(loop_args);
    let source = loop_source_text(loop_source, path)?;
    let keyed = inject_key(fragment, &index_name, path)?;

    let item_ref = Regex::new(&format!(r"\bthis\.{}\b", regex::escape(&item_name)))
        .map_err(|_| CompileError::InvalidLoopSource { path: path.clone() })?;
    let body = item_ref.replace_all(&keyed, item_name.as_str());
    let body = strip_this(&body);

    Ok(format!(
        "{}.map(({}:any, {}:number) => {{\n return ({});\n}})",
        strip_this(&source),
        item_name,
        index_name,
        body
    ))
}

pub fn wrap_condition(condition: &Value, fragment: &str, path: &NodePath) -> Result<String, CompileError> {
    let guard = match condition {
        Value::Bool(flag) => flag.to_string(),
        other => to_source(other, Position::Attribute, path)?,
    };
    Ok(format!("{} && {}", guard, fragment))
}
