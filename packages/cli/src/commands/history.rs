use crate::commands::apply::{read_commands, run_commands};
use crate::project::ProjectFile;
use anyhow::Result;
use blockpage_editor::HistoryEntryInfo;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// JSON command file to replay against the project
    pub commands: PathBuf,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

/// Replay a command file in memory and show the resulting undo/redo stacks.
/// The project file is never written.
pub fn history(args: HistoryArgs, cwd: &str) -> Result<()> {
    let commands = read_commands(&args.commands, cwd)?;
    let file = ProjectFile::locate(cwd)?;
    let mut store = file.open(cwd)?;

    if args.json {
        // Keep stdout parseable
        for command in commands {
            let _ = store.dispatch(command);
        }
        let report = serde_json::json!({
            "undo": store.history_entries(),
            "redo": store.redo_entries(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "⏪ Replaying commands...".bright_blue().bold());
    run_commands(&mut store, commands);

    println!();
    print_entries("Undo", &store.history_entries());
    print_entries("Redo", &store.redo_entries());
    Ok(())
}

fn print_entries(title: &str, entries: &[HistoryEntryInfo]) {
    println!("{} ({})", title.bold(), entries.len());
    if entries.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    // Most recent first
    for entry in entries.iter().rev() {
        println!(
            "  {} {:<22} {} mutation(s)  {}",
            "•".bright_blue(),
            entry.label,
            entry.mutations,
            entry.timestamp.format("%H:%M:%S%.3f").to_string().dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::{init, InitArgs};
    use std::fs;

    #[test]
    fn test_history_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        init(
            InitArgs {
                name: "Test".into(),
                emit: "html".into(),
                force: false,
            },
            cwd,
        )
        .unwrap();
        fs::write(
            dir.path().join("commands.json"),
            r#"[
                { "command": "addBlockFromTemplate", "blockType": "hero" },
                { "command": "renameProject", "name": "Renamed" },
                { "command": "undo" }
            ]"#,
        )
        .unwrap();
        let before = fs::read_to_string(dir.path().join("project.json")).unwrap();

        for json in [false, true] {
            history(
                HistoryArgs {
                    commands: PathBuf::from("commands.json"),
                    json,
                },
                cwd,
            )
            .unwrap();
        }

        assert_eq!(fs::read_to_string(dir.path().join("project.json")).unwrap(), before);
    }
}
