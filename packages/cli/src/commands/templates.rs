use anyhow::{anyhow, Result};
use blockpage_document::{TemplateCategory, TemplateRegistry};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Only list one category (layout, content, media, commerce, utility)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Print templates as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn templates(args: TemplatesArgs, _cwd: &str) -> Result<()> {
    let registry = TemplateRegistry::builtin();

    let selected = match &args.category {
        Some(name) => {
            let category: TemplateCategory = name.parse().map_err(|e: String| anyhow!(e))?;
            registry.by_category(category)
        }
        None => registry.iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    println!("{}", "🧱 Block templates".bright_blue().bold());
    for template in &selected {
        println!(
            "  {:<14} {:<10} {}",
            template.kind.as_str().bright_white(),
            template.category.as_str().dimmed(),
            template.description
        );
    }
    println!();
    println!("{} templates", selected.len());

    Ok(())
}
