//! Formatter Collaborator
//!
//! Generated panels are handed to a `SourceFormatter` before being returned.
//! `OxcFormatter` is the built-in one: TSX source is parsed with Oxc and
//! re-printed, nested stylesheets are re-indented.

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    Source,
    NestedStylesheet,
}

pub trait SourceFormatter {
    fn format(&self, source: &str, dialect: Dialect) -> Result<String, String>;
}

impl<F> SourceFormatter for F
where
    F: Fn(&str, Dialect) -> Result<String, String>,
{
    fn format(&self, source: &str, dialect: Dialect) -> Result<String, String> {
        self(source, dialect)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OxcFormatter;

impl SourceFormatter for OxcFormatter {
    fn format(&self, source: &str, dialect: Dialect) -> Result<String, String> {
        match dialect {
            Dialect::Source => format_source(source),
            Dialect::NestedStylesheet => format_stylesheet(source),
        }
    }
}

fn format_source(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; "));
    }

    let options = CodegenOptions {
        single_quote: true,
        ..CodegenOptions::default()
    };
    Ok(Codegen::new().with_options(options).build(&ret.program).code)
}

const INDENT: &str = "  ";

fn push_line(out: &mut String, depth: usize, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

/// Re-indent a nested stylesheet: one selector or declaration per line.
pub fn format_stylesheet(source: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut line = String::new();
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;

    for (offset, c) in source.char_indices() {
        if let Some(q) = quote {
            line.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                line.push(c);
            }
            '(' => {
                parens += 1;
                line.push(c);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                line.push(c);
            }
            '{' => {
                push_line(&mut out, depth, &format!("{} {{", line.trim()));
                line.clear();
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(format!("unexpected `}}` at offset {}", offset));
                }
                push_line(&mut out, depth, &line);
                line.clear();
                depth -= 1;
                push_line(&mut out, depth, "}");
            }
            ';' if parens == 0 => {
                line.push(';');
                push_line(&mut out, depth, &line);
                line.clear();
            }
            '\n' | '\r' => line.push(' '),
            _ => line.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string".to_string());
    }
    if depth != 0 {
        return Err(format!("{} unclosed block(s)", depth));
    }
    push_line(&mut out, 0, &line);
    Ok(out)
}
