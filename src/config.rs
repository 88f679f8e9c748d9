//! Configuration for similarity model training and prediction.

use serde::{Deserialize, Serialize};

use crate::errors::{KnnError, Result};

/// Configuration for item-item training and scoring.
///
/// Training depends only on `min_similarity` and `save_neighbors`; the
/// remaining fields are read by the [`Predictor`](crate::predict::Predictor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnConfig {
    /// Minimum similarity for an edge to be stored in a neighbor list.
    pub min_similarity: f64,
    /// Number of neighbors stored per item in the trained model
    /// (`None` or `Some(0)` for unlimited).
    pub save_neighbors: Option<usize>,
    /// Maximum number of neighbors used to score a single item
    /// (`None` for unlimited).
    pub max_neighbors: Option<usize>,
    /// Minimum number of neighbors for scoring an item.
    pub min_neighbors: usize,
    /// Suppress predictions drawn from fewer than `min_neighbors` neighbors.
    pub enforce_min_neighbors: bool,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            min_similarity: 1.0e-6,
            save_neighbors: None,
            max_neighbors: Some(20),
            min_neighbors: 1,
            enforce_min_neighbors: false,
        }
    }
}

impl KnnConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.min_similarity.is_finite() {
            return Err(KnnError::Config(format!(
                "min_similarity must be finite, got {}",
                self.min_similarity
            )));
        }
        if self.max_neighbors == Some(0) {
            return Err(KnnError::Config(
                "max_neighbors must be positive (use null for unlimited)".into(),
            ));
        }
        Ok(())
    }

    /// The per-item storage cap, with non-positive values meaning unlimited.
    pub fn neighbor_cap(&self) -> Option<usize> {
        self.save_neighbors.filter(|&n| n > 0)
    }
}
