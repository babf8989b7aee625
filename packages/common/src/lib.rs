pub mod content;
pub mod registry;
pub mod styles;
pub mod visitor;

pub use content::*;
pub use registry::*;
pub use styles::*;
pub use visitor::*;
