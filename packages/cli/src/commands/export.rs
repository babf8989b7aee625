use crate::project::ProjectFile;
use anyhow::{anyhow, Result};
use blockpage_compiler_react::compile_definitions;
use blockpage_export::{export_page, write_artifact, ExportFormat, ExportOptions};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Format to export (html, json, react); repeatable, defaults to the config's `emit`
    #[arg(short, long = "format")]
    pub formats: Vec<ExportFormat>,

    /// Page to export (defaults to the first page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Emit plain JavaScript instead of TypeScript for React
    #[arg(long)]
    pub javascript: bool,

    /// Also write a .d.ts next to the React scaffold
    #[arg(long)]
    pub definitions: bool,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let file = ProjectFile::locate(cwd)?;
    let store = file.open(cwd)?;
    let project = store.project();

    let page_id = match &args.page {
        Some(id) => id.clone(),
        None => store.current_page_id().to_string(),
    };
    let page = project
        .page(&page_id)
        .ok_or_else(|| anyhow!("Page not found: {}", page_id))?;

    let formats = if args.formats.is_empty() {
        file.config.emit.clone()
    } else {
        args.formats.clone()
    };

    let mut options = ExportOptions::default();
    options.react.use_typescript = !args.javascript;

    let out_dir = match &args.out_dir {
        Some(dir) => PathBuf::from(cwd).join(dir),
        None => file.config.get_out_dir(cwd),
    };

    if !args.stdout {
        println!(
            "{} {}",
            "📦 Exporting page".bright_blue().bold(),
            page.name.bright_white()
        );
    }

    let mut warning_count = 0;
    for format in formats {
        let artifact = export_page(project, &page_id, format, &options)?;

        for warning in &artifact.warnings {
            warning_count += 1;
            eprintln!("  {} {}", "⚠️".yellow(), warning.to_string().yellow());
        }

        if args.stdout {
            println!("{}", artifact.contents);
            continue;
        }

        let path = write_artifact(&artifact, &out_dir)?;
        println!("  {} {} → {}", "✓".green(), format, relative(&path, cwd));

        if format == ExportFormat::React && args.definitions {
            let definitions = compile_definitions(project, &page_id, options.react.clone())?;
            let path = out_dir.join(Path::new(&artifact.file_name).with_extension("d.ts"));
            fs::write(&path, definitions)?;
            println!("  {} {} → {}", "✓".green(), "d.ts", relative(&path, cwd));
        }
    }

    if !args.stdout {
        println!();
        if warning_count == 0 {
            println!("{} Export complete", "✅".green());
        } else {
            println!(
                "{} Export complete, {} blocks stubbed",
                "⚠️".yellow(),
                warning_count
            );
        }
    }

    Ok(())
}

fn relative(path: &Path, cwd: &str) -> String {
    path.strip_prefix(cwd).unwrap_or(path).display().to_string()
}
