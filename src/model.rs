//! The trained item-item model.

use std::borrow::Borrow;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::{
    ratings::{KeyIndex, RatingMatrix},
    similarity::NeighborList,
    types::{ItemIndex, Key, UserIndex},
};

/// Immutable result of one training pass: item means, per-item neighbor
/// lists, and the original ratings, all addressed through the key indices.
///
/// Never mutated after construction, so it can be shared across threads
/// (e.g. behind an `Arc`) for concurrent prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemItemModel<U: Key, I: Key> {
    users: KeyIndex<U>,
    items: KeyIndex<I>,
    item_means: Vec<f64>,
    neighborhoods: Vec<NeighborList>,
    ratings: RatingMatrix,
}

/// Summary counts for inspecting a trained model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelStats {
    /// Number of distinct users.
    pub num_users: usize,
    /// Number of distinct items.
    pub num_items: usize,
    /// Number of stored ratings.
    pub num_ratings: usize,
    /// Total stored similarity edges.
    pub num_edges: usize,
    /// Mean neighbor list length.
    pub avg_neighbors: f64,
    /// Items whose neighbor list is empty.
    pub items_without_neighbors: usize,
}

impl<U: Key, I: Key> ItemItemModel<U, I> {
    pub(crate) fn new(
        users: KeyIndex<U>,
        items: KeyIndex<I>,
        item_means: Vec<f64>,
        neighborhoods: Vec<NeighborList>,
        ratings: RatingMatrix,
    ) -> Self {
        Self {
            users,
            items,
            item_means,
            neighborhoods,
            ratings,
        }
    }

    /// User key index.
    pub fn users(&self) -> &KeyIndex<U> {
        &self.users
    }

    /// Item key index.
    pub fn items(&self) -> &KeyIndex<I> {
        &self.items
    }

    /// Mean rating of an item.
    pub fn item_mean<Q>(&self, item: &Q) -> Option<f64>
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.get(item).and_then(|i| self.mean_at(i))
    }

    /// Neighbors of an item as `(neighbor key, similarity)`, most similar
    /// first. `None` for an item the model was not trained on.
    pub fn neighbors<Q>(&self, item: &Q) -> Option<Vec<(&I, f64)>>
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let list = self.neighbor_list(self.items.get(item)?)?;
        Some(
            list.edges()
                .iter()
                .filter_map(|e| self.items.key(e.neighbor).map(|k| (k, e.similarity)))
                .collect(),
        )
    }

    /// Stored rating of `user` for `item`.
    pub fn rating<QU, QI>(&self, user: &QU, item: &QI) -> Option<f64>
    where
        U: Borrow<QU>,
        I: Borrow<QI>,
        QU: Hash + Eq + ?Sized,
        QI: Hash + Eq + ?Sized,
    {
        let u = self.users.get(user)?;
        let i = self.items.get(item)?;
        self.ratings.get(u, i)
    }

    /// All stored ratings of a user as `(item key, rating)`.
    pub fn user_ratings<Q>(&self, user: &Q) -> Option<Vec<(&I, f64)>>
    where
        U: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let u = self.users.get(user)?;
        Some(
            self.ratings
                .user_row(u)
                .filter_map(|(i, r)| self.items.key(i).map(|k| (k, r)))
                .collect(),
        )
    }

    /// Mean of the item at a dense index.
    pub fn mean_at(&self, item: ItemIndex) -> Option<f64> {
        self.item_means.get(item).copied()
    }

    /// Neighbor list of the item at a dense index.
    pub fn neighbor_list(&self, item: ItemIndex) -> Option<&NeighborList> {
        self.neighborhoods.get(item)
    }

    /// Stored `(item index, rating)` pairs of the user at a dense index.
    pub fn user_row(&self, user: UserIndex) -> impl Iterator<Item = (ItemIndex, f64)> + '_ {
        self.ratings.user_row(user)
    }

    /// Summary counts.
    pub fn stats(&self) -> ModelStats {
        let num_items = self.items.len();
        let num_edges: usize = self.neighborhoods.iter().map(NeighborList::len).sum();
        let avg_neighbors = if num_items > 0 {
            num_edges as f64 / num_items as f64
        } else {
            0.0
        };

        ModelStats {
            num_users: self.users.len(),
            num_items,
            num_ratings: self.ratings.nnz(),
            num_edges,
            avg_neighbors,
            items_without_neighbors: self.neighborhoods.iter().filter(|l| l.is_empty()).count(),
        }
    }
}
