//! Common core types used across the engine.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Dense contiguous index of an item in the rating matrix.
pub type ItemIndex = usize;

/// Dense contiguous index of a user in the rating matrix.
pub type UserIndex = usize;

/// Bound for user and item keys: any hashable, thread-safe identifier.
pub trait Key: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> Key for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// A single explicit rating observation.
///
/// At most one record per (user, item) pair is allowed in a training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord<U, I> {
    /// User key.
    pub user: U,
    /// Item key.
    pub item: I,
    /// Rating value.
    pub rating: f64,
}

impl<U, I> RatingRecord<U, I> {
    /// Create a new record.
    pub fn new(user: U, item: I, rating: f64) -> Self {
        Self { user, item, rating }
    }
}

impl<U, I> From<(U, I, f64)> for RatingRecord<U, I> {
    fn from((user, item, rating): (U, I, f64)) -> Self {
        Self { user, item, rating }
    }
}

/// Predicted rating for one candidate item; `score` is `None` when no
/// prediction can be made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction<I> {
    /// Candidate item key.
    pub item: I,
    /// Predicted rating, if any.
    pub score: Option<f64>,
}
