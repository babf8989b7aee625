use crate::context::{CompileOptions, CompilerContext};
use crate::definitions::compile_props_interface;
use crate::generators::{react_registry, ReactGenerator};
use blockpage_common::{dispatch_page, BlockContext, SectionStyle};
use blockpage_document::{BlockType, Page, Project, SerializationError, TemplateRegistry};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during React compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Page not found: {0}")]
    PageNotFound(String),
}

/// Scaffold source plus the blocks that had no component
#[derive(Debug)]
pub struct ReactOutput {
    pub code: String,
    pub warnings: Vec<SerializationError>,
}

/// Compile one page of `project` to a React component scaffold.
///
/// The scaffold is a starting point: one stub component per block kind and a
/// page component that lists the blocks in order.
pub fn compile_to_react(
    project: &Project,
    page_id: &str,
    options: CompileOptions,
) -> Result<ReactOutput, CompileError> {
    let page = project
        .page(page_id)
        .ok_or_else(|| CompileError::PageNotFound(page_id.to_string()))?;
    Ok(compile_page(project, page, options))
}

pub fn compile_page(project: &Project, page: &Page, options: CompileOptions) -> ReactOutput {
    let ctx = CompilerContext::new(options);
    let registry = react_registry();

    // Page body first so the set of used kinds is known
    let mut body = ctx.with_new_buffer();
    let mut used: Vec<(BlockType, ReactGenerator)> = Vec::new();
    for _ in 0..3 {
        body.indent();
    }
    let warnings = dispatch_page(
        project,
        page,
        &registry,
        &mut body,
        |generator, block, body| {
            if !used.iter().any(|(kind, _)| kind == block.kind()) {
                used.push((block.kind().clone(), *generator));
            }
            compile_block_element(block, body);
        },
        compile_unsupported,
    );
    for _ in 0..3 {
        body.dedent();
    }

    compile_imports(page, &ctx);

    let templates = TemplateRegistry::builtin();
    for (kind, generator) in &used {
        compile_component(kind, generator, &templates, &ctx);
    }

    let page_component = page_component_name(&page.name);
    ctx.open(&format!("export default function {}() {{", page_component));
    ctx.open("return (");
    ctx.open("<div className=\"min-h-screen bg-gray-50\">");
    ctx.merge_buffer(&body);
    ctx.close("</div>");
    ctx.close(");");
    ctx.close("}");

    debug!(
        page_id = %page.id,
        components = used.len(),
        stubs = warnings.len(),
        "Compiled page to React scaffold"
    );

    ReactOutput {
        code: ctx.get_output(),
        warnings,
    }
}

fn compile_imports(page: &Page, ctx: &CompilerContext) {
    ctx.add_line("// Generated React Component");
    ctx.add_line(&format!("// Page: {}", single_line(&page.name)));
    ctx.add_line("import React from 'react';");
    ctx.add("\n");
}

fn compile_component(
    kind: &BlockType,
    generator: &ReactGenerator,
    templates: &TemplateRegistry,
    ctx: &CompilerContext,
) {
    let component = component_name(kind);

    let signature = if ctx.options.use_typescript {
        compile_props_interface(&component, templates.get(kind), false, ctx);
        ctx.add("\n");
        format!("function {}(props: {}Props) {{", component, component)
    } else {
        format!("function {}(props) {{", component)
    };

    ctx.open(&signature);
    ctx.open("return (");
    ctx.open(&format!("<{} className={{props.className}}>", generator.tag));
    (generator.body)(ctx);
    ctx.close(&format!("</{}>", generator.tag));
    ctx.close(");");
    ctx.close("}");
    ctx.add("\n");
}

fn compile_block_element(block: &BlockContext<'_>, ctx: &mut CompilerContext) {
    let style = SectionStyle::from_effective(
        &block.effective_styles,
        block.block,
        &block.project.global_styles,
    );

    let mut element = format!(
        "<{} key={{{}}}",
        component_name(block.kind()),
        js_string(&block.block.id)
    );
    if !style.classes.is_empty() {
        element.push_str(&format!(" className={}", js_string(&style.class_attr())));
    }
    if ctx.options.include_content && !block.content().is_empty() {
        // Content maps are JSON objects, which are valid object literals
        match serde_json::to_string(block.content()) {
            Ok(props) => element.push_str(&format!(" {{...{}}}", props)),
            Err(err) => debug!(block_id = %block.block.id, %err, "Skipping block props"),
        }
    }
    element.push_str(" />");
    ctx.add_line(&element);
}

fn compile_unsupported(block: &BlockContext<'_>, ctx: &mut CompilerContext) {
    ctx.add_line(&format!(
        "{{/* unsupported block: {} */}}",
        block.kind().as_str().replace("*/", "* /")
    ));
}

/// `hero` → `HeroBlock`
pub(crate) fn component_name(kind: &BlockType) -> String {
    format!("{}Block", pascal_case(kind.as_str()))
}

/// `About us` → `AboutUsPage`
pub fn page_component_name(name: &str) -> String {
    let base = pascal_case(name);
    let base = if base.is_empty() {
        "Untitled".to_string()
    } else if base.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Page{}", base)
    } else {
        base
    };
    format!("{}Page", base)
}

fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn single_line(text: &str) -> String {
    text.replace(|c: char| c == '\n' || c == '\r', " ")
}
