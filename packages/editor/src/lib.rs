//! # Blockpage Editor
//!
//! Mutation Store and undo/redo history for block-based pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ leaf panels / CLI / async leaf tasks        │
//! └─────────────────────────────────────────────┘
//!                     ↓ Command
//! ┌─────────────────────────────────────────────┐
//! │ Store: the only writer                      │
//! │  - Validate, translate to Mutations         │
//! │  - Record (mutations, inverses) in history  │
//! │  - Best-effort persistence                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: Project → Pages → Blocks          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single writer**: one command runs to completion before the next
//! 2. **Fail soft**: bad commands are no-ops that report why
//! 3. **Invertible history**: every mutation knows how to undo itself
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpage_editor::{BlockPatch, Store, StoreConfig};
//! use blockpage_document::BlockType;
//!
//! let mut store = Store::new(StoreConfig::default());
//! let id = store.add_block_from_template(&BlockType::Hero).applied().unwrap();
//!
//! store.update_block(&id, BlockPatch::content("title", "Hello"));
//! store.undo();
//! ```

mod clock;
mod command;
mod errors;
mod mutations;
mod persistence;
mod state;
mod store;
mod tasks;
mod undo_stack;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, CommandOutcome, PagePatch};
pub use errors::{PersistError, StoreError};
pub use mutations::{BlockPatch, CoalesceKey, Mutation, MutationError};
pub use persistence::{FileStorage, MemoryStorage, ProjectStorage};
pub use state::EditorState;
pub use store::{Store, StoreConfig};
pub use tasks::{spawn_leaf_task, CommandQueue, CommandSender};
pub use undo_stack::{HistoryConfig, HistoryEntryInfo, MutationBatch, UndoStack};
