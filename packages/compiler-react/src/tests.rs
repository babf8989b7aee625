use crate::{compile_to_react, react_registry, CompileError, CompileOptions};
use blockpage_document::{Block, BlockType, Project, TemplateRegistry};
use chrono::Utc;

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn project_with(blocks: Vec<Block>) -> Project {
    let mut project = Project::new("Test", Utc::now());
    project.pages[0].id = "home".into();
    project.pages[0].blocks = blocks;
    project
}

fn template(kind: BlockType, id: &str) -> Block {
    TemplateRegistry::builtin()
        .get(&kind)
        .expect("builtin template")
        .instantiate()
        .with_id(id)
}

#[test]
fn test_scaffold_shell() {
    let project = project_with(vec![template(BlockType::Hero, "b1")]);

    let output = compile_to_react(&project, "home", CompileOptions::default()).expect("Failed to compile");
    let code = output.code;

    println!("Generated code:\n{}", code);

    assert!(code.starts_with("// Generated React Component"));
    assert!(code.contains("import React from 'react';"));
    assert!(code.contains("export default function HomePage() {"));
    assert!(code.contains("<div className=\"min-h-screen bg-gray-50\">"));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_one_component_per_distinct_kind() {
    let project = project_with(vec![
        template(BlockType::Hero, "b1"),
        template(BlockType::Cta, "b2"),
        template(BlockType::Hero, "b3"),
    ]);

    let code = compile_to_react(&project, "home", CompileOptions::default())
        .expect("Failed to compile")
        .code;

    println!("Generated code:\n{}", code);

    assert_eq!(code.matches("function HeroBlock(props: HeroBlockProps) {").count(), 1);
    assert_eq!(code.matches("function CtaBlock(props: CtaBlockProps) {").count(), 1);
    assert_eq!(code.matches("<HeroBlock key=").count(), 2);
    assert!(code.contains("interface HeroBlockProps {"));
    assert!(code.contains("buttonLink: string;"));
}

#[test]
fn test_blocks_listed_in_page_order() {
    let project = project_with(vec![
        template(BlockType::Footer, "first"),
        template(BlockType::Stats, "second"),
        template(BlockType::Header, "third"),
    ]);

    let code = compile_to_react(&project, "home", CompileOptions::default())
        .expect("Failed to compile")
        .code;

    let first = code.find("key={\"first\"}").expect("first");
    let second = code.find("key={\"second\"}").expect("second");
    let third = code.find("key={\"third\"}").expect("third");
    assert!(first < second && second < third);
}

#[test]
fn test_block_content_and_classes_become_props() {
    let hero = template(BlockType::Hero, "b1").with_content("title", "Say \"hi\"");
    let project = project_with(vec![hero]);

    let code = compile_to_react(&project, "home", CompileOptions::default())
        .expect("Failed to compile")
        .code;

    println!("Generated code:\n{}", code);

    assert!(code.contains("\"title\":\"Say \\\"hi\\\"\""));
    assert!(code.contains("className=\"text-center bg-gradient-to-br"));
}

#[test]
fn test_plain_javascript_without_content() {
    let project = project_with(vec![template(BlockType::Faq, "f1")]);
    let options = CompileOptions {
        use_typescript: false,
        include_content: false,
    };

    let code = compile_to_react(&project, "home", options).expect("Failed to compile").code;

    println!("Generated code:\n{}", code);

    assert!(code.contains("function FaqBlock(props) {"));
    assert!(!code.contains("interface"));
    assert!(!code.contains("{..."));
    assert!(normalize_whitespace(&code).contains("<FaqBlock key={\"f1\"} className=\"py-16 px-6 container mx-auto\" />"));
}

#[test]
fn test_unknown_kind_becomes_comment() {
    let project = project_with(vec![
        template(BlockType::Hero, "b1"),
        Block::new(BlockType::Other("carousel".into())).with_id("x1"),
    ]);

    let output = compile_to_react(&project, "home", CompileOptions::default()).expect("Failed to compile");

    println!("Generated code:\n{}", output.code);

    assert!(output.code.contains("{/* unsupported block: carousel */}"));
    assert!(!output.code.contains("CarouselBlock"));
    assert_eq!(output.warnings.len(), 1);
}

#[test]
fn test_page_name_drives_component_name() {
    let mut project = project_with(vec![]);
    project.pages[0].name = "About us".into();

    let code = compile_to_react(&project, "home", CompileOptions::default())
        .expect("Failed to compile")
        .code;

    assert!(code.contains("// Page: About us"));
    assert!(code.contains("export default function AboutUsPage() {"));
}

#[test]
fn test_every_builtin_template_has_a_component() {
    let registry = react_registry();
    let templates = TemplateRegistry::builtin();
    assert!(registry.missing(templates.kinds().iter()).is_empty());

    let blocks = templates
        .iter()
        .enumerate()
        .map(|(i, t)| t.instantiate().with_id(format!("b{}", i)))
        .collect();
    let output = compile_to_react(&project_with(blocks), "home", CompileOptions::default())
        .expect("Failed to compile");

    assert!(output.warnings.is_empty());
    assert_eq!(output.code.matches("function ").count(), templates.len() + 1);
}

#[test]
fn test_unknown_page() {
    let project = project_with(vec![]);
    let err = compile_to_react(&project, "missing", CompileOptions::default()).unwrap_err();
    assert_eq!(err, CompileError::PageNotFound("missing".into()));
}
