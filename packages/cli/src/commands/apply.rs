use crate::project::ProjectFile;
use anyhow::{bail, Context, Result};
use blockpage_editor::{Command, Store, StoreError};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON file with one command or an array of commands
    pub commands: PathBuf,

    /// Run the commands without saving the project
    #[arg(long)]
    pub dry_run: bool,

    /// Fail (and save nothing) if any command is rejected
    #[arg(long)]
    pub strict: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandFile {
    Many(Vec<Command>),
    One(Command),
}

/// Read `path` (relative to `cwd`) as a list of commands
pub fn read_commands(path: &Path, cwd: &str) -> Result<Vec<Command>> {
    let path = PathBuf::from(cwd).join(path);
    let source = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read command file {}", path.display()))?;
    let file: CommandFile = serde_json::from_str(&source)
        .with_context(|| format!("Invalid command file {}", path.display()))?;

    Ok(match file {
        CommandFile::Many(commands) => commands,
        CommandFile::One(command) => vec![command],
    })
}

/// Dispatch every command in order; returns how many were rejected.
/// Undo/redo with nothing to replay is a silent no-op, not a rejection.
pub fn run_commands(store: &mut Store, commands: Vec<Command>) -> usize {
    let mut rejected = 0;
    for command in commands {
        let name = command.name();
        let outcome = store.dispatch(command);
        match outcome.error() {
            None => println!("  {} {}", "✓".green(), name),
            Some(StoreError::HistoryUnderflow) => {
                println!("  {} {} {}", "·".dimmed(), name, "(nothing to replay)".dimmed())
            }
            Some(err) => {
                rejected += 1;
                println!("  {} {} - {}", "✗".red(), name, err.to_string().red());
            }
        }
    }
    rejected
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let commands = read_commands(&args.commands, cwd)?;
    let file = ProjectFile::locate(cwd)?;
    let mut store = file.open(cwd)?;

    println!(
        "{} {} commands",
        "⚙️  Applying".bright_blue().bold(),
        commands.len()
    );

    let total = commands.len();
    let rejected = run_commands(&mut store, commands);

    println!();
    if rejected > 0 && args.strict {
        bail!("{} of {} commands were rejected; nothing saved", rejected, total);
    }

    if args.dry_run {
        println!("{}", "Dry run, project not saved".dimmed());
    } else {
        file.save(&store)?;
    }

    if rejected == 0 {
        println!("{} Applied {} commands", "✅".green(), total);
    } else {
        println!(
            "{} Applied {} commands, {} rejected",
            "⚠️".yellow(),
            total - rejected,
            rejected
        );
    }

    Ok(())
}
