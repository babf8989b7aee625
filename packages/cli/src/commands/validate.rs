use crate::project::ProjectFile;
use anyhow::{bail, Result};
use blockpage_document::BlockType;
use blockpage_export::missing_generators;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeSet;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Treat blocks without a template as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let file = ProjectFile::locate(cwd)?;
    // Loading runs the full document validation
    let store = file.open(cwd)?;
    let project = store.project();
    let templates = store.templates();

    println!(
        "🔍 {} {}",
        "Validating".green().bold(),
        file.path.display()
    );
    println!("   Project: {} ({})", project.name.bright_white(), project.id.dimmed());
    println!();

    let mut unknown: BTreeSet<BlockType> = BTreeSet::new();
    for page in &project.pages {
        println!(
            "   {} {} /{} - {} blocks",
            "•".bright_blue(),
            page.name,
            page.slug,
            page.blocks.len()
        );
        for block in &page.blocks {
            if !templates.contains(&block.kind) {
                unknown.insert(block.kind.clone());
                println!(
                    "     {} {} ({}) has no template",
                    "⚠️".yellow(),
                    block.id,
                    block.kind.as_str().yellow()
                );
            }
        }
    }

    for (format, kinds) in missing_generators(templates) {
        let kinds: Vec<&str> = kinds.iter().map(BlockType::as_str).collect();
        println!(
            "   {} {} cannot render: {}",
            "⚠️".yellow(),
            format,
            kinds.join(", ")
        );
    }

    println!();
    if unknown.is_empty() {
        println!("✨ {} Project is valid", "Done".green().bold());
        return Ok(());
    }

    let kinds: Vec<&str> = unknown.iter().map(BlockType::as_str).collect();
    if args.strict {
        bail!("Blocks without a template: {}", kinds.join(", "));
    }
    println!(
        "✨ {} Project is valid; {} will export as stubs",
        "Done".yellow().bold(),
        kinds.join(", ")
    );
    Ok(())
}
