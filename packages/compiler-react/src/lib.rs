//! # Blockpage React compiler
//!
//! Emits a component scaffold for one page: a stub component per block kind
//! and a default-exported page component listing the blocks in order. The
//! output is a starting point for hand-written code, not a finished app.

mod compiler;
mod context;
mod definitions;
mod generators;

pub use compiler::{compile_page, compile_to_react, page_component_name, CompileError, ReactOutput};
pub use context::{CompileOptions, CompilerContext};
pub use definitions::{compile_definitions, ts_type};
pub use generators::{react_registry, ReactGenerator};

#[cfg(test)]
mod tests;
