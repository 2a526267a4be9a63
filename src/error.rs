//! Error types for rs-struktur.
//!
//! Structure detection itself never fails. These errors come from the edges:
//! reading the rendered page and merging caller configuration.

/// Error type for input and configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A JSON snapshot or JSON configuration was malformed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no node to analyze (no `<body>`, empty snapshot).
    #[error("No root node to analyze")]
    MissingRoot,

    /// A configuration override was out of range or malformed.
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option key as the caller spelled it.
        name: &'static str,
        /// What was wrong with the value.
        reason: String,
    },
}

/// Result type alias for rs-struktur operations.
pub type Result<T> = std::result::Result<T, Error>;
