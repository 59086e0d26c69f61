use thiserror::Error;

/// Main error type for manifest parsing and encoding
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// A recognized tag failed required-attribute validation
    #[error("Malformed tag {tag}: {reason}")]
    MalformedTag { tag: String, reason: String },

    /// A value the parser depends on is not a valid number or timestamp
    #[error("Malformed value for {field}: {value:?}")]
    MalformedValue { field: String, value: String },

    /// An element kind has no encoder in the tag table
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// A range mutation could not locate its boundaries
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// A standard I/O error from the byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON report could not be written
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Errors returned by `Playlist::modify_range`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("start element not found")]
    StartNotFound,

    #[error("end element not found")]
    EndNotFound,
}

impl PlaylistError {
    pub(crate) fn malformed_tag(tag: &str, reason: impl Into<String>) -> Self {
        PlaylistError::MalformedTag {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_value(field: &str, value: &str) -> Self {
        PlaylistError::MalformedValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlaylistError>;
