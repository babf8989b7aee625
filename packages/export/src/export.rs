use std::fs;
use std::path::{Path, PathBuf};

use blockpage_compiler_html::{compile_to_html, html_registry, CompileOptions as HtmlOptions};
use blockpage_compiler_react::{compile_to_react, react_registry, CompileOptions as ReactOptions};
use blockpage_document::{to_json, BlockType, Project, SerializationError, TemplateRegistry};
use tracing::{debug, info};

use crate::error::ExportError;
use crate::format::ExportFormat;

/// Per-format compiler options
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub html: HtmlOptions,
    pub react: ReactOptions,
}

/// One downloadable export
#[derive(Debug)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    /// `<page name>.<ext>`
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
    /// Blocks that were emitted as stubs
    pub warnings: Vec<SerializationError>,
}

/// Export one page of `project`.
///
/// JSON carries the whole project so it can be loaded back; HTML and React
/// render only the page.
pub fn export_page(
    project: &Project,
    page_id: &str,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    let page = project
        .page(page_id)
        .ok_or_else(|| ExportError::PageNotFound(page_id.to_string()))?;

    let (contents, warnings) = match format {
        ExportFormat::Html => {
            let output = compile_to_html(project, page_id, options.html.clone())?;
            (output.html, output.warnings)
        }
        ExportFormat::Json => (to_json(project)?, Vec::new()),
        ExportFormat::React => {
            let output = compile_to_react(project, page_id, options.react.clone())?;
            (output.code, output.warnings)
        }
    };

    for warning in &warnings {
        debug!(format = %format, page_id = %page_id, "{}", warning);
    }

    Ok(ExportArtifact {
        format,
        file_name: format!("{}.{}", file_stem(&page.name), format.extension()),
        mime_type: format.mime_type(),
        contents,
        warnings,
    })
}

/// Write `artifact` into `out_dir`, creating the directory if needed
pub fn write_artifact(artifact: &ExportArtifact, out_dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = out_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), bytes = artifact.contents.len(), "Wrote export");
    Ok(path)
}

/// Template kinds each format would have to stub.
///
/// JSON is kind-agnostic and never appears.
pub fn missing_generators(templates: &TemplateRegistry) -> Vec<(ExportFormat, Vec<BlockType>)> {
    let kinds = templates.kinds();
    let html = html_registry().missing(kinds.iter());
    let react = react_registry().missing(kinds.iter());

    [(ExportFormat::Html, html), (ExportFormat::React, react)]
        .into_iter()
        .filter(|(_, missing)| !missing.is_empty())
        .collect()
}

/// Page names are user text; keep file names on one path segment
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.').to_string();
    if stem.is_empty() {
        "page".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Home"), "Home");
        assert_eq!(file_stem("About us"), "About us");
        assert_eq!(file_stem("../etc/passwd"), "-etc-passwd");
        assert_eq!(file_stem("  "), "page");
        assert_eq!(file_stem(".."), "page");
    }

    #[test]
    fn test_builtin_templates_are_fully_covered() {
        assert!(missing_generators(&TemplateRegistry::builtin()).is_empty());
    }
}
