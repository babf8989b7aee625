use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// A project, page or block failed the document model's structural rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Malformed project data: {0}")]
    Malformed(String),

    #[error("Project has no pages")]
    NoPages,

    #[error("Missing id on {0}")]
    MissingId(String),

    #[error("Duplicate page id: {0}")]
    DuplicatePageId(String),

    #[error("Duplicate block id '{block_id}' on page '{page_id}'")]
    DuplicateBlockId { page_id: String, block_id: String },

    #[error("Block '{block_id}' ({kind}) is missing required content key '{key}'")]
    MissingContentKey {
        block_id: String,
        kind: String,
        key: String,
    },
}

impl ValidationError {
    pub fn missing_content_key(
        block_id: impl Into<String>,
        kind: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::MissingContentKey {
            block_id: block_id.into(),
            kind: kind.into(),
            key: key.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        ValidationError::Malformed(e.to_string())
    }
}

/// Export-side failures. `UnsupportedBlock` is reported, never fatal.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("No {format} generator registered for block type '{kind}' (block {block_id})")]
    UnsupportedBlock {
        format: String,
        kind: String,
        block_id: String,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SerializationError {
    pub fn unsupported_block(
        format: impl Into<String>,
        kind: impl Into<String>,
        block_id: impl Into<String>,
    ) -> Self {
        Self::UnsupportedBlock {
            format: format.into(),
            kind: kind.into(),
            block_id: block_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ValidationError::missing_content_key("b1", "hero", "title");
        assert_eq!(
            err.to_string(),
            "Block 'b1' (hero) is missing required content key 'title'"
        );

        let err = SerializationError::unsupported_block("html", "carousel", "b9");
        assert!(err.to_string().contains("carousel"));
        assert!(err.to_string().contains("b9"));
    }

    #[test]
    fn test_json_error_becomes_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ValidationError = json_err.into();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }
}
