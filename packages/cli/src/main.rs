mod commands;
mod config;
mod project;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, apply, export, history, init, templates, validate, AddArgs, ApplyArgs, ExportArgs,
    HistoryArgs, InitArgs, TemplatesArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Blockpage CLI - build landing pages from blocks
#[derive(Parser, Debug)]
#[command(name = "blockpage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log store and export activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new blockpage project
    Init(InitArgs),

    /// List the block templates
    Templates(TemplatesArgs),

    /// Add a block to a page
    Add(AddArgs),

    /// Apply a JSON file of editor commands
    Apply(ApplyArgs),

    /// Export a page to HTML, JSON or React
    Export(ExportArgs),

    /// Check the project file
    Validate(ValidateArgs),

    /// Replay commands and show the undo/redo history
    History(HistoryArgs),
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Templates(args) => templates(args, &cwd),
                Command::Add(args) => add(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
                Command::Export(args) => export(args, &cwd),
                Command::Validate(args) => validate(args, &cwd),
                Command::History(args) => history(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
