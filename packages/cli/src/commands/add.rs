use crate::project::ProjectFile;
use anyhow::{anyhow, bail, Result};
use blockpage_document::{Block, BlockType};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Block type (see `blockpage templates`)
    pub block_type: String,

    /// Page to add to (defaults to the current page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Insert position; clamped to the page
    #[arg(short, long, allow_negative_numbers = true)]
    pub index: Option<i64>,

    /// Content override, KEY=VALUE; VALUE is parsed as JSON when it can be
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let file = ProjectFile::locate(cwd)?;
    let mut store = file.open(cwd)?;

    let kind = BlockType::from(args.block_type.as_str());
    if !store.templates().contains(&kind) {
        bail!(
            "Unknown block type '{}' (run `blockpage templates` to list them)",
            args.block_type
        );
    }

    if let Some(page_id) = &args.page {
        store.set_current_page(page_id).into_result()?;
    }

    let mut block = Block::new(kind);
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        block = block.with_content(key, value);
    }

    let outcome = match args.index {
        Some(index) => store.add_block_at(block, index),
        None => store.add_block(block),
    };
    let block_id = outcome.into_result()?;

    file.save(&store)?;

    println!(
        "  {} Added {} block {} to page {}",
        "✓".green(),
        args.block_type.bright_white(),
        block_id.dimmed(),
        store.current_page_id()
    );
    Ok(())
}

/// `title=Hello` → ("title", "Hello"); `columns=4` → ("columns", 4)
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", assignment))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", assignment);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
