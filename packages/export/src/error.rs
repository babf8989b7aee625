use std::path::PathBuf;

use blockpage_document::SerializationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unknown export format: {0} (expected html, json or react)")]
    UnknownFormat(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<blockpage_compiler_html::CompileError> for ExportError {
    fn from(err: blockpage_compiler_html::CompileError) -> Self {
        match err {
            blockpage_compiler_html::CompileError::PageNotFound(id) => ExportError::PageNotFound(id),
        }
    }
}

impl From<blockpage_compiler_react::CompileError> for ExportError {
    fn from(err: blockpage_compiler_react::CompileError) -> Self {
        match err {
            blockpage_compiler_react::CompileError::PageNotFound(id) => ExportError::PageNotFound(id),
        }
    }
}
