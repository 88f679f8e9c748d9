//! Orchestrates: ratings -> means -> normalized vectors -> neighbor lists -> model.

use std::time::Instant;

use crate::{
    config::KnnConfig,
    errors::Result,
    model::ItemItemModel,
    ratings::{JsonlRatings, RatingSet},
    similarity::{Normalizer, SimilarityEngine},
    types::{Key, RatingRecord},
};

/// High-level training pipeline.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: KnnConfig,
}

impl TrainingPipeline {
    /// Create a new pipeline with the given config.
    pub fn new(config: KnnConfig) -> Self {
        Self { config }
    }

    /// Train a model from rating records.
    ///
    /// Fails on an invalid config, empty input, non-finite or duplicate
    /// ratings. Items with constant ratings are legal and end up with no
    /// neighbors.
    pub fn train<U, I, R>(&self, records: impl IntoIterator<Item = R>) -> Result<ItemItemModel<U, I>>
    where
        U: Key,
        I: Key,
        R: Into<RatingRecord<U, I>>,
    {
        self.config.validate()?;
        let watch = Instant::now();

        let set = RatingSet::from_records(records)?;
        tracing::info!(
            "[{:.2?}] indexed {} ratings from {} users on {} items",
            watch.elapsed(),
            set.matrix().nnz(),
            set.users().len(),
            set.items().len()
        );
        let (users, items, ratings) = set.into_parts();

        let normalized = Normalizer::normalize(&ratings)?;
        tracing::info!(
            "[{:.2?}] computed means and normalized vectors for {} items",
            watch.elapsed(),
            normalized.item_means.len()
        );

        let engine = SimilarityEngine::from_config(&self.config);
        let neighborhoods = engine.neighborhoods(&normalized.matrix);
        let num_pairs: usize = neighborhoods.iter().map(|l| l.len()).sum();
        tracing::info!(
            "[{:.2?}] computed {} neighbor pairs (min_similarity = {}, save_neighbors = {:?})",
            watch.elapsed(),
            num_pairs,
            self.config.min_similarity,
            self.config.neighbor_cap()
        );

        Ok(ItemItemModel::new(
            users,
            items,
            normalized.item_means,
            neighborhoods,
            ratings,
        ))
    }

    /// Train a model from a JSONL rating file.
    pub fn train_from_jsonl(&self, source: &JsonlRatings) -> Result<ItemItemModel<String, String>> {
        tracing::info!("reading ratings from {}", source.path().display());
        let records = source.read_all()?;
        self.train(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::KnnError;
    use approx::assert_relative_eq;

    #[test]
    fn trains_small_model() {
        let model: ItemItemModel<&str, &str> = TrainingPipeline::new(KnnConfig::default())
            .train(vec![
                ("u1", "a", 4.0),
                ("u2", "a", 2.0),
                ("u1", "c", 5.0),
                ("u2", "c", 1.0),
            ])
            .unwrap();

        assert_relative_eq!(model.item_mean("a").unwrap(), 3.0);
        let nbrs = model.neighbors("a").unwrap();
        assert_eq!(nbrs.len(), 1);
        assert_eq!(*nbrs[0].0, "c");
        assert_relative_eq!(nbrs[0].1, 1.0, epsilon = 1e-9);
        assert_eq!(model.rating("u2", "c"), Some(1.0));
    }

    #[test]
    fn invalid_config_is_rejected_before_training() {
        let config = KnnConfig {
            max_neighbors: Some(0),
            ..KnnConfig::default()
        };
        let result: Result<ItemItemModel<u32, u32>> =
            TrainingPipeline::new(config).train(vec![(1u32, 1u32, 1.0)]);
        let err = result.unwrap_err();
        assert!(matches!(err, KnnError::Config(_)));
    }

    #[test]
    fn empty_ratings_fail() {
        let records: Vec<(u32, u32, f64)> = Vec::new();
        let result: Result<ItemItemModel<u32, u32>> =
            TrainingPipeline::new(KnnConfig::default()).train(records);
        let err = result.unwrap_err();
        assert!(matches!(err, KnnError::EmptyInput));
    }
}
