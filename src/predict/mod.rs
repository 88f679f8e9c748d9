//! Neighborhood-based rating prediction against a trained model.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use rayon::prelude::*;

use crate::{
    config::KnnConfig,
    model::ItemItemModel,
    types::{ItemIndex, Key, Prediction},
};

/// Scores candidate items for one user as a similarity-weighted average of
/// the user's mean-adjusted ratings of each candidate's stored neighbors.
///
/// The model's neighbor lists already carry the training-time threshold and
/// cap; `max_neighbors` is a second truncation applied per prediction after
/// restricting to neighbors the user has rated.
#[derive(Debug, Clone)]
pub struct Predictor {
    max_neighbors: Option<usize>,
    min_neighbors: usize,
    enforce_min_neighbors: bool,
}

impl Predictor {
    /// Create a predictor from the scoring parameters of a config.
    pub fn new(config: &KnnConfig) -> Self {
        Self {
            max_neighbors: config.max_neighbors,
            min_neighbors: config.min_neighbors,
            enforce_min_neighbors: config.enforce_min_neighbors,
        }
    }

    /// Predict ratings of `items` for `user`, in the order requested.
    ///
    /// `ratings` overrides the user's stored ratings when given; otherwise
    /// they are read from the model. Ratings of items the model does not
    /// know are ignored. Unknown candidates, and candidates without a usable
    /// neighbor, get `score: None` without affecting the rest of the batch.
    pub fn predict<U, I, Q>(
        &self,
        model: &ItemItemModel<U, I>,
        user: &Q,
        items: &[I],
        ratings: Option<&HashMap<I, f64>>,
    ) -> Vec<Prediction<I>>
    where
        U: Key + Borrow<Q>,
        I: Key,
        Q: Hash + Eq + ?Sized,
    {
        let deviations = match ratings {
            Some(explicit) => deviations_from_explicit(model, explicit),
            None => deviations_from_model(model, user),
        };

        let results: Vec<Prediction<I>> = items
            .par_iter()
            .map(|item| Prediction {
                item: item.clone(),
                score: model
                    .items()
                    .get(item)
                    .and_then(|idx| self.score(model, idx, &deviations)),
            })
            .collect();

        tracing::debug!(
            "predicted {} of {} items from {} user ratings",
            results.iter().filter(|p| p.score.is_some()).count(),
            items.len(),
            deviations.len()
        );
        results
    }

    /// Score one item given the user's deviations from item means, keyed by
    /// item index. `None` when no prediction can be made.
    pub fn score<U: Key, I: Key>(
        &self,
        model: &ItemItemModel<U, I>,
        item: ItemIndex,
        deviations: &HashMap<ItemIndex, f64>,
    ) -> Option<f64> {
        let mean = model.mean_at(item)?;
        let list = model.neighbor_list(item)?;

        // Lists are stored in descending similarity order, so taking a
        // prefix after filtering keeps the first-seen entry among ties.
        let usable = list
            .edges()
            .iter()
            .filter_map(|e| deviations.get(&e.neighbor).map(|&dev| (e.similarity, dev)))
            .take(self.max_neighbors.unwrap_or(usize::MAX));

        let (mut weighted, mut total, mut count) = (0.0, 0.0, 0usize);
        for (similarity, deviation) in usable {
            weighted += similarity * deviation;
            total += similarity;
            count += 1;
        }

        if self.enforce_min_neighbors && count < self.min_neighbors {
            return None;
        }
        if total == 0.0 {
            return None;
        }
        Some(mean + weighted / total)
    }
}

/// Stored ratings of a known user, as deviations from item means.
fn deviations_from_model<U, I, Q>(model: &ItemItemModel<U, I>, user: &Q) -> HashMap<ItemIndex, f64>
where
    U: Key + Borrow<Q>,
    I: Key,
    Q: Hash + Eq + ?Sized,
{
    let Some(u) = model.users().get(user) else {
        tracing::debug!("user not in model and no ratings supplied");
        return HashMap::new();
    };
    model
        .user_row(u)
        .filter_map(|(item, rating)| model.mean_at(item).map(|mean| (item, rating - mean)))
        .collect()
}

fn deviations_from_explicit<U: Key, I: Key>(
    model: &ItemItemModel<U, I>,
    ratings: &HashMap<I, f64>,
) -> HashMap<ItemIndex, f64> {
    ratings
        .iter()
        .filter_map(|(key, &rating)| {
            let item = model.items().get(key)?;
            model.mean_at(item).map(|mean| (item, rating - mean))
        })
        .collect()
}
