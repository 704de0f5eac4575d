use serde::Serialize;
use thiserror::Error;

use crate::codegen::Panel;
use crate::schema::NodePath;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_UNSUPPORTED_NODE_KIND: &str = "SCHEMA-KIND";
pub const ERR_MALFORMED_FUNCTION: &str = "SCHEMA-FUNCTION";
pub const ERR_MALFORMED_LOOP_TARGET: &str = "SCHEMA-LOOP-TARGET";
pub const ERR_INVALID_LOOP_SOURCE: &str = "SCHEMA-LOOP-SOURCE";
pub const ERR_FORMATTER: &str = "FORMAT";
pub const ERR_SCHEMA_JSON: &str = "SCHEMA-JSON";

fn get_hint(code: &str) -> &'static str {
    match code {
        ERR_UNSUPPORTED_NODE_KIND => {
            "componentName must be one of page, block, component, div, text, image."
        }
        ERR_MALFORMED_FUNCTION => "Function values must have a parameter list and a body.",
        ERR_MALFORMED_LOOP_TARGET => "Looped nodes must render to an element tag.",
        ERR_INVALID_LOOP_SOURCE => "loop must be an array or a {{ expression }}.",
        ERR_FORMATTER => "Generated text was rejected by the formatter.",
        ERR_SCHEMA_JSON => "Input must match the schema and options shape.",
        _ => "Unknown error.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A panel the formatter refused, with the formatter's own diagnostic.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormatFailure {
    pub panel: String,
    pub diagnostic: String,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unsupported node kind `{kind}` at {path}")]
    UnsupportedNodeKind { kind: String, path: NodePath },
    #[error("malformed function source at {path}: {reason}")]
    MalformedFunctionSource { path: NodePath, reason: String },
    #[error("cannot inject loop key at {path}: fragment does not start with an element tag: `{fragment}`")]
    MalformedLoopTarget { path: NodePath, fragment: String },
    #[error("invalid loop source at {path}: expected an array or a {{{{ expression }}}}")]
    InvalidLoopSource { path: NodePath },
    #[error("formatter rejected {}", describe_failures(.failures))]
    Formatter {
        failures: Vec<FormatFailure>,
        /// Panels that formatted cleanly.
        formatted: Vec<Panel>,
    },
    #[error("invalid schema input: {0}")]
    Schema(#[from] serde_json::Error),
}

fn describe_failures(failures: &[FormatFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.panel, f.diagnostic))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedNodeKind { .. } => ERR_UNSUPPORTED_NODE_KIND,
            CompileError::MalformedFunctionSource { .. } => ERR_MALFORMED_FUNCTION,
            CompileError::MalformedLoopTarget { .. } => ERR_MALFORMED_LOOP_TARGET,
            CompileError::InvalidLoopSource { .. } => ERR_INVALID_LOOP_SOURCE,
            CompileError::Formatter { .. } => ERR_FORMATTER,
            CompileError::Schema(_) => ERR_SCHEMA_JSON,
        }
    }

    pub fn hint(&self) -> &'static str {
        get_hint(self.code())
    }

    /// Schema location that caused the error, when there is one.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            CompileError::UnsupportedNodeKind { path, .. }
            | CompileError::MalformedFunctionSource { path, .. }
            | CompileError::MalformedLoopTarget { path, .. }
            | CompileError::InvalidLoopSource { path } => Some(path),
            CompileError::Formatter { .. } | CompileError::Schema(_) => None,
        }
    }
}

/// Report for a node left out of the markup in lenient mode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedNode {
    pub path: NodePath,
    pub component_name: String,
}
