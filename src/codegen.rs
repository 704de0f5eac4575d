//! Codegen Module
//!
//! Drives one compilation: seeds the context, runs the walk, serializes the
//! context into the four panels and formats each panel independently.

use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::classify::serialize_value;
use crate::context::GenerationContext;
use crate::format::{Dialect, SourceFormatter};
use crate::options::CompileOptions;
use crate::schema::SchemaNode;
use crate::style::convert_to_responsive_units;
use crate::transform::transform_schema;
use crate::validate::{CompileError, FormatFailure, SkippedNode};

pub const INDEX_PANEL: &str = "index.tsx";
pub const STYLE_PANEL: &str = "style.js";
pub const STYLESHEET_PANEL: &str = "style.less";
pub const RESPONSIVE_PANEL: &str = "style.responsive.js";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub name: String,
    pub content: String,
    pub kind: Dialect,
}

impl Panel {
    fn new(name: &str, content: String, kind: Dialect) -> Self {
        Panel {
            name: name.to_string(),
            content,
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub component_name: String,
    pub panels: Vec<Panel>,
    /// Compiled data-source methods; not yet spliced into component bodies.
    pub data_methods: Vec<String>,
    pub skipped: Vec<SkippedNode>,
}

impl CompileOutput {
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.name == name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PANEL EMISSION
// ═══════════════════════════════════════════════════════════════════════════════

fn resolve_root_name(schema: &SchemaNode, options: &CompileOptions) -> String {
    if let Some(name) = options.component_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = schema.my_component_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}{}", schema.component_name, millis)
}

fn util_source(value: &Value) -> String {
    match value {
        Value::String(source) => source.clone(),
        other => serialize_value(other),
    }
}

fn index_source(ctx: &GenerationContext) -> String {
    let mut lines = vec![
        "'use strict';".to_string(),
        String::new(),
        "import React, { useState, useEffect } from 'react';".to_string(),
    ];
    lines.extend(ctx.imports.lines().iter().cloned());
    lines.push("import styles from './style.less';".to_string());
    for component in &ctx.components {
        lines.push(format!("interface {}Props {{}};", component.name));
    }
    lines.extend(ctx.utils.iter().cloned());
    lines.extend(ctx.components.iter().map(|c| c.source.clone()));
    lines.push(format!("export default {};", ctx.root_name));
    lines.join("\n")
}

fn raw_panels(ctx: &GenerationContext, viewport_width: f64) -> Vec<Panel> {
    let mut responsive = ctx.styles.clone();
    convert_to_responsive_units(&mut responsive, viewport_width);

    vec![
        Panel::new(INDEX_PANEL, index_source(ctx), Dialect::Source),
        Panel::new(
            STYLE_PANEL,
            format!("export default {}", ctx.styles.to_source()),
            Dialect::Source,
        ),
        Panel::new(STYLESHEET_PANEL, ctx.nested_stylesheet(), Dialect::NestedStylesheet),
        Panel::new(
            RESPONSIVE_PANEL,
            format!("export default {}", responsive.to_source()),
            Dialect::Source,
        ),
    ]
}

fn format_panels(panels: Vec<Panel>, formatter: &dyn SourceFormatter) -> Result<Vec<Panel>, CompileError> {
    let mut formatted = Vec::with_capacity(panels.len());
    let mut failures = Vec::new();
    for panel in panels {
        match formatter.format(&panel.content, panel.kind) {
            Ok(content) => {
                log::debug!("formatted panel `{}`", panel.name);
                formatted.push(Panel { content, ..panel });
            }
            Err(diagnostic) => {
                log::debug!("formatter rejected panel `{}`: {}", panel.name, diagnostic);
                failures.push(FormatFailure {
                    panel: panel.name,
                    diagnostic,
                });
            }
        }
    }
    if failures.is_empty() {
        Ok(formatted)
    } else {
        Err(CompileError::Formatter { failures, formatted })
    }
}

/// Compile a schema into the `index.tsx`, `style.js`, `style.less` and
/// `style.responsive.js` panels.
pub fn compile_schema(
    schema: &SchemaNode,
    options: &CompileOptions,
    formatter: &dyn SourceFormatter,
) -> Result<CompileOutput, CompileError> {
    let root_name = resolve_root_name(schema, options);
    log::debug!("compiling `{}` as component `{}`", schema.component_name, root_name);

    let mut ctx = GenerationContext::new(&root_name);
    ctx.skip_unsupported = options.skip_unsupported;
    for (name, value) in &options.utils {
        ctx.add_util(name, &util_source(value));
    }

    transform_schema(&mut ctx, schema)?;

    let panels = format_panels(raw_panels(&ctx, options.responsive.width), formatter)?;
    Ok(CompileOutput {
        component_name: root_name,
        panels,
        data_methods: ctx.data_methods,
        skipped: ctx.skipped,
    })
}

/// JSON entry point for hosts that pass the schema and options as text.
pub fn compile_json(
    schema_json: &str,
    options_json: Option<&str>,
    formatter: &dyn SourceFormatter,
) -> Result<CompileOutput, CompileError> {
    let schema: SchemaNode = serde_json::from_str(schema_json)?;
    let options: CompileOptions = match options_json {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text)?,
        _ => CompileOptions::default(),
    };
    compile_schema(&schema, &options, formatter)
}
