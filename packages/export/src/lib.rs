//! # Blockpage Export
//!
//! Turns one page of a project into a downloadable artifact: standalone HTML,
//! the canonical project JSON, or a React component scaffold.
//!
//! ```rust,ignore
//! use blockpage_export::{export_page, ExportFormat, ExportOptions};
//!
//! let artifact = export_page(&project, &page_id, ExportFormat::Html, &ExportOptions::default())?;
//! assert_eq!(artifact.file_name, "Home.html");
//! ```

mod error;
mod export;
mod format;

pub use error::ExportError;
pub use export::{export_page, missing_generators, write_artifact, ExportArtifact, ExportOptions};
pub use format::ExportFormat;
