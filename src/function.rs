//! Function Source Decomposition
//!
//! Splits a function's source text into its parameter list and body using the
//! Oxc parser, so delimiters inside strings, comments and nested closures do
//! not confuse the split.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, ObjectPropertyKind, Statement};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParts {
    /// Parameter text without the surrounding parentheses.
    pub params: String,
    /// Body text without the surrounding braces.
    pub body: String,
    pub is_async: bool,
}

impl FunctionParts {
    /// Re-emit as an arrow function literal.
    pub fn to_arrow(&self) -> String {
        format!("{}({}) => {{{}}}", self.async_prefix(), self.params, self.body)
    }

    /// `"async "` for async sources, empty otherwise.
    pub fn async_prefix(&self) -> &'static str {
        if self.is_async {
            "async "
        } else {
            ""
        }
    }
}

fn source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

fn slice(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

fn strip_parens(params: &str) -> String {
    let trimmed = params.trim();
    match trimmed.strip_prefix('(').and_then(|p| p.strip_suffix(')')) {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn body_text(source: &str, span: Span, expression_body: bool) -> String {
    let text = slice(source, span).trim();
    if expression_body {
        return format!("return {};", text);
    }
    match text.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        Some(inner) => inner.to_string(),
        None => text.to_string(),
    }
}

fn parts_from_expression(source: &str, expr: &Expression<'_>) -> Option<FunctionParts> {
    match expr {
        Expression::ParenthesizedExpression(inner) => parts_from_expression(source, &inner.expression),
        Expression::FunctionExpression(func) => {
            let body = func.body.as_ref()?;
            Some(FunctionParts {
                params: strip_parens(slice(source, func.params.span)),
                body: body_text(source, body.span, false),
                is_async: func.r#async,
            })
        }
        Expression::ArrowFunctionExpression(arrow) => Some(FunctionParts {
            params: strip_parens(slice(source, arrow.params.span)),
            body: body_text(source, arrow.body.span, arrow.expression),
            is_async: arrow.r#async,
        }),
        Expression::ObjectExpression(object) => match object.properties.first()? {
            ObjectPropertyKind::ObjectProperty(property) if property.method => {
                parts_from_expression(source, &property.value)
            }
            _ => None,
        },
        _ => None,
    }
}

fn try_decompose(wrapped: &str) -> Result<Option<FunctionParts>, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, wrapped, source_type()).parse();
    if !ret.errors.is_empty() {
        return Err(ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; "));
    }

    let parts = match ret.program.body.first() {
        Some(Statement::ExpressionStatement(stmt)) => parts_from_expression(wrapped, &stmt.expression),
        Some(other) => {
            log::trace!("function source parsed as a non-expression statement at {:?}", other.span());
            None
        }
        None => None,
    };
    Ok(parts)
}

/// Decompose a function's source into parameter text and body text.
///
/// Accepts function expressions, arrow functions (expression bodies become
/// `return <expr>;`) and method shorthand (`name(a) { ... }`).
pub fn decompose_function(source: &str) -> Result<FunctionParts, String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err("empty function source".to_string());
    }

    let as_expression = try_decompose(&format!("({})", trimmed));
    if let Ok(Some(parts)) = as_expression {
        return Ok(parts);
    }

    // Method shorthand only parses inside an object literal.
    match try_decompose(&format!("({{{}}})", trimmed)) {
        Ok(Some(parts)) => Ok(parts),
        _ => Err(match as_expression {
            Err(diagnostic) => diagnostic,
            Ok(_) => "source has no parameter list and body".to_string(),
        }),
    }
}
