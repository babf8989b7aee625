use blockpage_document::{BlockTemplate, BlockType, Project, TemplateRegistry};
use serde_json::Value;

use crate::compiler::{component_name, page_component_name, CompileError};
use crate::context::{CompileOptions, CompilerContext};

/// Compile a TypeScript definition file (.d.ts) for one page's scaffold
pub fn compile_definitions(
    project: &Project,
    page_id: &str,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let page = project
        .page(page_id)
        .ok_or_else(|| CompileError::PageNotFound(page_id.to_string()))?;
    let ctx = CompilerContext::new(options);
    let templates = TemplateRegistry::builtin();

    ctx.add_line("import React from \"react\";");
    ctx.add("\n");

    let mut seen: Vec<&BlockType> = Vec::new();
    for block in &page.blocks {
        if seen.contains(&&block.kind) {
            continue;
        }
        seen.push(&block.kind);

        let component = component_name(&block.kind);
        compile_props_interface(&component, templates.get(&block.kind), true, &ctx);
        ctx.add_line(&format!(
            "export const {}: React.FC<{}Props>;",
            component, component
        ));
        ctx.add("\n");
    }

    ctx.add_line(&format!(
        "export default function {}(): JSX.Element;",
        page_component_name(&page.name)
    ));

    Ok(ctx.get_output())
}

/// `interface <Component>Props { ... }` from the template's default content
pub(crate) fn compile_props_interface(
    component: &str,
    template: Option<&BlockTemplate>,
    export: bool,
    ctx: &CompilerContext,
) {
    let keyword = if export { "export interface" } else { "interface" };
    ctx.open(&format!("{} {}Props {{", keyword, component));

    match template {
        Some(template) => {
            for (key, value) in &template.default_content {
                ctx.add_line(&format!("{}: {};", ts_key(key), ts_type(value)));
            }
        }
        None => ctx.add_line("[key: string]: unknown;"),
    }
    ctx.add_line("className?: string;");

    ctx.close("}");
}

/// TypeScript type describing a JSON value's shape
pub fn ts_type(value: &Value) -> String {
    match value {
        Value::Null => "unknown".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => array_type(items),
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", ts_key(key), ts_type(value)))
                .collect();
            format!("{{ {} }}", fields.join("; "))
        }
    }
}

fn array_type(items: &[Value]) -> String {
    if items.is_empty() {
        return "unknown[]".to_string();
    }

    // Objects merge into one element type; keys missing somewhere are optional
    if items.iter().all(Value::is_object) {
        let mut keys: Vec<(&String, &Value)> = Vec::new();
        for item in items.iter().filter_map(Value::as_object) {
            for (key, value) in item {
                if !keys.iter().any(|(k, _)| *k == key) {
                    keys.push((key, value));
                }
            }
        }
        let fields: Vec<String> = keys
            .iter()
            .map(|(key, value)| {
                let everywhere = items
                    .iter()
                    .all(|item| item.get(key.as_str()).is_some());
                let marker = if everywhere { "" } else { "?" };
                format!("{}{}: {}", ts_key(key), marker, ts_type(value))
            })
            .collect();
        return format!("{{ {} }}[]", fields.join("; "));
    }

    let mut types: Vec<String> = Vec::new();
    for item in items {
        let ty = ts_type(item);
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    if types.len() == 1 {
        format!("{}[]", types[0])
    } else {
        format!("Array<{}>", types.join(" | "))
    }
}

fn ts_key(key: &str) -> String {
    let is_identifier = key
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}
