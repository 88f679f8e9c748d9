//! Sparse item-item similarity computation with threshold and top-K truncation.

use rayon::prelude::*;

use crate::{
    config::KnnConfig,
    ratings::RatingMatrix,
    similarity::{accumulator::SimilarityAccumulator, NeighborList},
    types::ItemIndex,
};

/// Computes neighbor lists from normalized item vectors.
///
/// Similarity between items `i` and `j` is the dot product of their
/// normalized columns over co-rated users, i.e. entry `(i, j)` of `X^T X`.
/// Only user rows reachable from an item's column are visited, so item pairs
/// without a co-rater never appear.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    min_similarity: f64,
    save_neighbors: Option<usize>,
}

impl SimilarityEngine {
    /// Create an engine with an explicit threshold and storage cap.
    pub fn new(min_similarity: f64, save_neighbors: Option<usize>) -> Self {
        Self {
            min_similarity,
            save_neighbors,
        }
    }

    /// Create an engine from the training parameters of a config.
    pub fn from_config(config: &KnnConfig) -> Self {
        Self::new(config.min_similarity, config.neighbor_cap())
    }

    /// Neighbor lists for every item, indexed by item.
    ///
    /// Items are processed in parallel; each worker reuses one scratch row.
    pub fn neighborhoods(&self, normalized: &RatingMatrix) -> Vec<NeighborList> {
        let n_items = normalized.n_items();

        (0..n_items)
            .into_par_iter()
            .map_init(
                || SimilarityAccumulator::new(n_items),
                |acc, item| {
                    accumulate(normalized, item, acc);
                    NeighborList::truncated(
                        item,
                        acc.drain(item),
                        self.min_similarity,
                        self.save_neighbors,
                    )
                },
            )
            .collect()
    }

    /// Untruncated, unthresholded similarities of `item` to every item it
    /// shares a rater with, sorted by neighbor index.
    pub fn raw_similarities(&self, normalized: &RatingMatrix, item: ItemIndex) -> Vec<(ItemIndex, f64)> {
        let mut acc = SimilarityAccumulator::new(normalized.n_items());
        accumulate(normalized, item, &mut acc);
        let mut sims = acc.drain(item);
        sims.sort_unstable_by_key(|&(neighbor, _)| neighbor);
        sims
    }
}

/// Row `item` of `X^T X`: for each rater of `item`, add their normalized
/// rating products with every other item they rated.
fn accumulate(normalized: &RatingMatrix, item: ItemIndex, acc: &mut SimilarityAccumulator) {
    for (user, value) in normalized.item_column(item) {
        for (other, other_value) in normalized.user_row(user) {
            acc.add_to(other, value * other_value);
        }
    }
}
