//! Error types for itemknn-core.

use thiserror::Error;

/// Top-level error type for training and model construction.
///
/// Per-item conditions (an unknown candidate item, a candidate with no usable
/// neighbors, an item with constant ratings) are not errors: they surface as
/// "no prediction" or as an empty neighbor list.
#[derive(Debug, Error)]
pub enum KnnError {
    /// Configuration-related errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Training was invoked without any ratings.
    #[error("no ratings to train on")]
    EmptyInput,

    /// Malformed rating input (non-finite values, bad records).
    #[error("ratings error: {0}")]
    Ratings(String),

    /// The same (user, item) pair was rated more than once.
    #[error("duplicate rating for user {user} and item {item}")]
    DuplicateRating {
        /// Debug rendering of the user key.
        user: String,
        /// Debug rendering of the item key.
        item: String,
    },

    /// A non-finite value was produced during normalization. This is an
    /// internal invariant failure, not a user-facing condition.
    #[error("non-finite value produced for item index {item}")]
    NonFinite {
        /// Dense index of the offending item.
        item: usize,
    },

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for itemknn operations.
pub type Result<T> = std::result::Result<T, KnnError>;
