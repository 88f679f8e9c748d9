//! Item-item similarity: normalization, the sparse similarity kernel, and
//! neighbor lists.

mod accumulator;
pub mod engine;
pub mod neighbors;
pub mod normalize;

pub use engine::SimilarityEngine;
pub use neighbors::{NeighborList, SimilarityEdge};
pub use normalize::{NormalizedRatings, Normalizer, NORMALIZE_EPSILON};

use crate::{ratings::RatingMatrix, types::ItemIndex};

/// Adjusted cosine similarity of two items from their normalized columns,
/// by sorted-merge intersection over co-rated users.
///
/// Returns `0.0` when the items share no rater.
pub fn adjusted_cosine(normalized: &RatingMatrix, a: ItemIndex, b: ItemIndex) -> f64 {
    let mut left: Vec<_> = normalized.item_column(a).collect();
    let mut right: Vec<_> = normalized.item_column(b).collect();
    left.sort_unstable_by_key(|&(u, _)| u);
    right.sort_unstable_by_key(|&(u, _)| u);

    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += left[i].1 * right[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}
