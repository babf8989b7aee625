//! # Blockpage HTML compiler
//!
//! Renders one page of a project as a standalone HTML document: theme as CSS
//! custom properties, one element per block, utility classes from the shared
//! CSS framework.

mod compiler;
mod generators;


pub use compiler::{
    compile_page, compile_to_html, CompileError, CompileOptions, HtmlOutput, PRETENDARD_CSS,
    TAILWIND_CDN,
};
pub use generators::{html_registry, HtmlGenerator};
