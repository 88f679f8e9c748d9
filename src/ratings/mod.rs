//! Sparse rating store: key indexing, the sparse rating matrix, and ingestion.

/// Dense index assignment for user and item keys.
pub mod index;
/// Sparse users x items rating matrix.
pub mod matrix;
/// Validated, indexed rating sets.
pub mod dataset;
/// JSONL rating loader.
pub mod loader;

pub use dataset::RatingSet;
pub use index::KeyIndex;
pub use loader::JsonlRatings;
pub use matrix::RatingMatrix;
