//! # Blockpage Document
//!
//! Shared vocabulary of the page builder: the Project / Page / Block model,
//! block templates, validation, style resolution and the canonical JSON form.
//!
//! ```text
//! Project ─┬─ globalStyles (theme)
//!          └─ pages[] ── blocks[] ── { id, type, content{}, styles{} }
//! ```

pub mod error;
pub mod id_generator;
pub mod model;
pub mod serializer;
pub mod style;
pub mod templates;
pub mod validate;

pub use error::{SerializationError, ValidationError, ValidationResult};
pub use id_generator::{new_id, slugify};
pub use model::{
    AnimationDescriptor, AttrMap, Block, BlockType, GlobalStyles, Page, PageSettings, Project,
    ProjectMetadata,
};
pub use serializer::{from_json, from_value, to_json};
pub use style::{resolve, resolve_block};
pub use templates::{BlockTemplate, TemplateCategory, TemplateRegistry};
pub use validate::{validate_block, validate_page, validate_project};
