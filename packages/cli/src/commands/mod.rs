pub mod add;
pub mod apply;
pub mod export;
pub mod history;
pub mod init;
pub mod templates;
pub mod validate;

pub use add::{add, AddArgs};
pub use apply::{apply, ApplyArgs};
pub use export::{export, ExportArgs};
pub use history::{history, HistoryArgs};
pub use init::{init, InitArgs};
pub use templates::{templates, TemplatesArgs};
pub use validate::{validate, ValidateArgs};
