use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use blockpage_editor::{Store, StoreConfig};
use blockpage_export::ExportFormat;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name
    #[arg(short, long, default_value = "My Website")]
    pub name: String,

    /// Export formats (html, json, react, all)
    #[arg(short, long, default_value = "html")]
    pub emit: String,

    /// Force overwrite existing config and project
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing blockpage project...".bright_blue().bold());

    let emit = match args.emit.as_str() {
        "all" => ExportFormat::ALL.to_vec(),
        list => list
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<ExportFormat>, _>>()?,
    };

    let config = Config {
        emit,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let project_path = config.get_project_path(cwd);
    if !project_path.exists() || args.force {
        let mut store = Store::new(StoreConfig::default());
        store.create_project(args.name.clone());
        fs::write(&project_path, store.to_json()?)?;
        println!("  {} Created {}", "✓".green(), config.project_file);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: blockpage templates");
    println!("  2. Run: blockpage add hero --set title=\"Hello\"");
    println!("  3. Run: blockpage export, then check {}/", config.out_dir);

    Ok(())
}
