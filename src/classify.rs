//! Text Classifier
//!
//! Decides whether a schema value is a literal, a `{{ ... }}` expression or a
//! function, and renders it as source text for attribute or inline-content
//! positions.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::function::{decompose_function, FunctionParts};
use crate::schema::NodePath;
use crate::validate::CompileError;

lazy_static! {
    static ref EXPRESSION_RE: Regex = Regex::new(r"(?s)^\{\{(.*)\}\}$").unwrap();
    static ref FUNCTION_RE: Regex = Regex::new(
        r"^\s*(?:async\s+)?(?:function\b[^(]*\(|(?:\([^()]*\)|[A-Za-z_$][\w$]*)\s*=>)"
    )
    .unwrap();
}

const JS_FUNCTION_TAG: &str = "JSFunction";
const JS_EXPRESSION_TAG: &str = "JSExpression";

/// Where a classified value is spliced into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// `key={...}`: literals are quoted, expressions are bare.
    Attribute,
    /// Element children: literals are verbatim, expressions keep one brace layer.
    InlineContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueClass<'a> {
    Expression(&'a str),
    Literal(&'a str),
    Function(&'a str),
    Data(&'a Value),
}

/// Inner text of a whole-string `{{ ... }}` expression.
pub fn expression_body(text: &str) -> Option<&str> {
    EXPRESSION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn looks_like_function(text: &str) -> bool {
    FUNCTION_RE.is_match(text)
}

fn tagged<'a>(value: &'a Value, tag: &str) -> Option<&'a str> {
    let object = value.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some(tag) {
        return None;
    }
    object.get("value").and_then(Value::as_str)
}

pub fn classify(value: &Value) -> ValueClass<'_> {
    if let Some(source) = tagged(value, JS_FUNCTION_TAG) {
        return ValueClass::Function(source);
    }
    if let Some(source) = tagged(value, JS_EXPRESSION_TAG) {
        return ValueClass::Expression(source.trim());
    }
    match value {
        Value::String(text) => {
            if let Some(body) = expression_body(text) {
                ValueClass::Expression(body)
            } else if looks_like_function(text) {
                ValueClass::Function(text)
            } else {
                ValueClass::Literal(text)
            }
        }
        other => ValueClass::Data(other),
    }
}

/// Decompose a function value, reporting failures against `path`.
pub fn function_parts(source: &str, path: &NodePath) -> Result<FunctionParts, CompileError> {
    decompose_function(source).map_err(|reason| CompileError::MalformedFunctionSource {
        path: path.clone(),
        reason,
    })
}

fn quote_single(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Line terminators inside string literals.
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a value as source text for the given position.
pub fn to_source(value: &Value, position: Position, path: &NodePath) -> Result<String, CompileError> {
    Ok(match classify(value) {
        ValueClass::Expression(body) => match position {
            Position::Attribute => body.to_string(),
            Position::InlineContent => format!("{{{}}}", body),
        },
        ValueClass::Literal(text) => match position {
            Position::Attribute => quote_single(text),
            Position::InlineContent => text.to_string(),
        },
        ValueClass::Function(source) => function_parts(source, path)?.to_arrow(),
        ValueClass::Data(data) => serialize_value(data),
    })
}

/// Compact JSON-like serialization that expands function values to their
/// source text instead of quoting them.
pub fn serialize_value(value: &Value) -> String {
    if let Some(source) = tagged(value, JS_FUNCTION_TAG) {
        return source.trim().to_string();
    }
    if let Some(source) = tagged(value, JS_EXPRESSION_TAG) {
        return source.trim().to_string();
    }
    match value {
        Value::String(text) if looks_like_function(text) => text.trim().to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(serialize_value).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}:{}", Value::String(key.clone()), serialize_value(value)))
                .collect();
            format!("{{{}}}", entries.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attr(value: Value) -> String {
        to_source(&value, Position::Attribute, &NodePath::root()).unwrap()
    }

    fn inline(value: Value) -> String {
        to_source(&value, Position::InlineContent, &NodePath::root()).unwrap()
    }

    #[test_log::test]
    fn test_expression_detection() {
        assert_eq!(expression_body("{{ greeting }}"), Some("greeting"));
        assert_eq!(expression_body("{{this.state.list}}"), Some("this.state.list"));
        assert_eq!(expression_body("Hello {{ name }}"), None);
        assert_eq!(expression_body("{ single }"), None);
    }

    #[test_log::test]
    fn test_expression_positions() {
        assert_eq!(attr(json!("{{ greeting }}")), "greeting");
        assert_eq!(inline(json!("{{ greeting }}")), "{greeting}");
    }

    #[test_log::test]
    fn test_literal_positions() {
        assert_eq!(attr(json!("Hello")), "'Hello'");
        assert_eq!(inline(json!("Hello")), "Hello");
        assert_eq!(attr(json!("it's")), "'it\\'s'");
    }

    #[test_log::test]
    fn test_attribute_literal_escapes_line_breaks() {
        assert_eq!(attr(json!("a\nb")), "'a\\nb'");
        assert_eq!(attr(json!("a\r\tb")), "'a\\r\\tb'");
        assert_eq!(attr(json!("a\u{2028}b")), "'a\\u2028b'");
        assert_eq!(attr(json!("bell\u{7}")), "'bell\\u0007'");
        assert_eq!(attr(json!("C:\\dir")), "'C:\\\\dir'");
    }

    #[test_log::test]
    fn test_function_detection() {
        assert!(looks_like_function("function (e) { return e; }"));
        assert!(looks_like_function("async function load() {}"));
        assert!(looks_like_function("(a, b) => a + b"));
        assert!(looks_like_function("item => item.id"));
        assert!(!looks_like_function("Hello (world)"));
        assert!(!looks_like_function("functional design"));
    }

    #[test_log::test]
    fn test_function_is_reemitted_as_arrow() {
        assert_eq!(
            attr(json!("function (e) { console.log(e); }")),
            "(e) => { console.log(e); }"
        );
        assert_eq!(
            attr(json!({ "type": "JSFunction", "value": "onTap(evt) { go(evt); }" })),
            "(evt) => { go(evt); }"
        );
    }

    #[test_log::test]
    fn test_tagged_expression() {
        assert_eq!(attr(json!({ "type": "JSExpression", "value": "this.state.open" })), "this.state.open");
    }

    #[test_log::test]
    fn test_malformed_function_reports_path() {
        let path = NodePath::root().child(3).field("props").field("onClick");
        let err = to_source(&json!({ "type": "JSFunction", "value": "not a function" }), Position::Attribute, &path)
            .unwrap_err();
        match err {
            CompileError::MalformedFunctionSource { path: at, .. } => assert_eq!(at, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test_log::test]
    fn test_data_values() {
        assert_eq!(attr(json!(42)), "42");
        assert_eq!(attr(json!(true)), "true");
        assert_eq!(attr(json!(null)), "null");
        assert_eq!(attr(json!([1, "a"])), "[1,\"a\"]");
        assert_eq!(attr(json!({ "a": { "b": 1 } })), "{\"a\":{\"b\":1}}");
    }

    #[test_log::test]
    fn test_serialize_expands_nested_functions() {
        let value = json!({
            "headers": { "x": "1" },
            "transform": "(r) => r.data",
            "hook": { "type": "JSFunction", "value": "function () { return 1; }" }
        });
        assert_eq!(
            serialize_value(&value),
            "{\"headers\":{\"x\":\"1\"},\"transform\":(r) => r.data,\"hook\":function () { return 1; }}"
        );
    }
}
