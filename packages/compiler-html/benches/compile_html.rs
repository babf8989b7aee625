use blockpage_compiler_html::{compile_to_html, CompileOptions};
use blockpage_document::{Project, TemplateRegistry};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn landing_page(copies: usize) -> Project {
    let templates = TemplateRegistry::builtin();
    let mut project = Project::new("Bench", Utc::now());
    for _ in 0..copies {
        for template in templates.iter() {
            project.pages[0].blocks.push(template.instantiate());
        }
    }
    project
}

fn compile_every_template(c: &mut Criterion) {
    let project = landing_page(1);
    let page_id = project.pages[0].id.clone();

    c.bench_function("compile_every_template", |b| {
        b.iter(|| compile_to_html(black_box(&project), &page_id, CompileOptions::default()))
    });
}

fn compile_long_page(c: &mut Criterion) {
    let project = landing_page(20);
    let page_id = project.pages[0].id.clone();

    c.bench_function("compile_long_page", |b| {
        b.iter(|| compile_to_html(black_box(&project), &page_id, CompileOptions::default()))
    });
}

criterion_group!(benches, compile_every_template, compile_long_page);
criterion_main!(benches);
