//! Error types for the editor

use blockpage_document::ValidationError;
use thiserror::Error;

use crate::mutations::MutationError;

/// Why a Store command was absorbed as a no-op.
///
/// None of these unwind past the Store; they come back inside
/// [`CommandOutcome::Noop`](crate::CommandOutcome) so the caller is notified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("No template registered for block type '{0}'")]
    UnknownTemplate(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Nothing to undo or redo")]
    HistoryUnderflow,
}

impl From<MutationError> for StoreError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::BlockNotFound(id) => StoreError::BlockNotFound(id),
            MutationError::PageNotFound(id) => StoreError::PageNotFound(id),
            MutationError::DuplicateBlockId { page_id, block_id } => {
                StoreError::Validation(ValidationError::DuplicateBlockId { page_id, block_id })
            }
            MutationError::DuplicatePageId(id) => {
                StoreError::Validation(ValidationError::DuplicatePageId(id))
            }
            MutationError::MissingId(what) => StoreError::Validation(ValidationError::MissingId(what)),
            MutationError::LastPage => {
                StoreError::InvariantViolation("a project must keep at least one page".to_string())
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Best-effort persistence failures. Logged, never rolled back.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("No stored project with id {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored project is invalid: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_errors_map_to_store_taxonomy() {
        assert_eq!(
            StoreError::from(MutationError::BlockNotFound("b1".into())),
            StoreError::BlockNotFound("b1".into())
        );
        assert!(matches!(
            StoreError::from(MutationError::LastPage),
            StoreError::InvariantViolation(_)
        ));
        assert!(matches!(
            StoreError::from(MutationError::DuplicateBlockId {
                page_id: "p1".into(),
                block_id: "b1".into()
            }),
            StoreError::Validation(ValidationError::DuplicateBlockId { .. })
        ));
    }
}
