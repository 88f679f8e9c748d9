//! Similarity edges and per-item neighbor lists.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::ItemIndex;

/// Outgoing edge from a source item to one of its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Neighbor item index.
    pub neighbor: ItemIndex,
    /// Adjusted cosine similarity between source and neighbor.
    pub similarity: f64,
}

/// Stored neighbors of one item: thresholded, sorted by descending
/// similarity (ties by ascending neighbor index) and capped.
///
/// Lists are built independently per item, so `j` in the list of `i` does
/// not imply `i` in the list of `j`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborList {
    edges: Vec<SimilarityEdge>,
}

impl NeighborList {
    /// Build the list for `item` from raw `(neighbor, similarity)` candidates.
    ///
    /// Drops the item itself and anything below `min_similarity`, then keeps
    /// the `cap` most similar (all of them when `cap` is `None`).
    pub fn truncated(
        item: ItemIndex,
        candidates: Vec<(ItemIndex, f64)>,
        min_similarity: f64,
        cap: Option<usize>,
    ) -> Self {
        let mut edges: Vec<SimilarityEdge> = candidates
            .into_iter()
            .filter(|&(neighbor, similarity)| neighbor != item && similarity >= min_similarity)
            .map(|(neighbor, similarity)| SimilarityEdge { neighbor, similarity })
            .collect();

        edges.sort_unstable_by_key(|e| (Reverse(OrderedFloat(e.similarity)), e.neighbor));
        if let Some(cap) = cap {
            edges.truncate(cap);
        }

        Self { edges }
    }

    /// Edges in descending similarity order.
    pub fn edges(&self) -> &[SimilarityEdge] {
        &self.edges
    }

    /// Number of stored neighbors.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the item has no stored neighbors.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_sorts_and_caps() {
        let list = NeighborList::truncated(
            0,
            vec![(3, 0.2), (0, 1.0), (1, 0.9), (2, -0.5), (4, 0.9), (5, 1.0e-9)],
            1.0e-6,
            Some(3),
        );
        let got: Vec<_> = list.edges().iter().map(|e| e.neighbor).collect();
        // ties at 0.9 go to the lower index; self and sub-threshold dropped
        assert_eq!(got, vec![1, 4, 3]);
        assert_eq!(list.edges()[1].similarity, 0.9);
    }

    #[test]
    fn unlimited_cap_keeps_everything_above_threshold() {
        let list = NeighborList::truncated(9, vec![(1, 0.1), (2, 0.3), (3, 0.2)], 0.15, None);
        assert_eq!(list.len(), 2);
        assert_eq!(list.edges()[0].neighbor, 2);
    }
}
