//! Mean-centering and unit normalization of item rating vectors.

use rayon::prelude::*;

use crate::{
    errors::{KnnError, Result},
    ratings::RatingMatrix,
    types::{ItemIndex, UserIndex},
};

/// Centered vectors whose L1 norm is at or below this are left unscaled.
pub const NORMALIZE_EPSILON: f64 = 1.0e-10;

/// Per-item means and the centered, unit-length item vectors.
#[derive(Debug, Clone)]
pub struct NormalizedRatings {
    /// Mean rating of each item, indexed by item.
    pub item_means: Vec<f64>,
    /// Same sparsity pattern as the input, with normalized values.
    pub matrix: RatingMatrix,
}

/// Mean-centers and L2-normalizes each item column of a rating matrix.
#[derive(Debug, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Arithmetic mean of every item column.
    ///
    /// Every item must have at least one rating.
    pub fn item_means(ratings: &RatingMatrix) -> Result<Vec<f64>> {
        (0..ratings.n_items())
            .into_par_iter()
            .map(|item| {
                let (sum, count) = ratings
                    .item_column(item)
                    .fold((0.0, 0usize), |(s, n), (_, r)| (s + r, n + 1));
                if count == 0 {
                    return Err(KnnError::Ratings(format!("item index {} has no ratings", item)));
                }
                let mean = sum / count as f64;
                if !mean.is_finite() {
                    return Err(KnnError::NonFinite { item });
                }
                Ok(mean)
            })
            .collect()
    }

    /// Center and normalize every item column.
    pub fn normalize(ratings: &RatingMatrix) -> Result<NormalizedRatings> {
        let item_means = Self::item_means(ratings)?;

        let columns: Vec<Vec<(UserIndex, f64)>> = (0..ratings.n_items())
            .into_par_iter()
            .map(|item| {
                let column: Vec<_> = ratings.item_column(item).collect();
                normalize_column(&column, item_means[item])
            })
            .collect();

        let mut entries: Vec<(UserIndex, ItemIndex, f64)> = Vec::with_capacity(ratings.nnz());
        for (item, column) in columns.into_iter().enumerate() {
            for (user, value) in column {
                if !value.is_finite() {
                    return Err(KnnError::NonFinite { item });
                }
                entries.push((user, item, value));
            }
        }

        let matrix = RatingMatrix::from_entries(ratings.n_users(), ratings.n_items(), &entries);
        Ok(NormalizedRatings { item_means, matrix })
    }
}

/// Center one column on `mean` and scale it to unit L2 norm, unless the
/// centered values are (near) all zero.
pub fn normalize_column(column: &[(UserIndex, f64)], mean: f64) -> Vec<(UserIndex, f64)> {
    let centered: Vec<(UserIndex, f64)> = column.iter().map(|&(u, r)| (u, r - mean)).collect();

    let abs_sum: f64 = centered.iter().map(|(_, v)| v.abs()).sum();
    if abs_sum <= NORMALIZE_EPSILON {
        return centered;
    }

    // scale by the largest magnitude so squaring cannot overflow
    let scale = centered.iter().fold(0.0_f64, |m, (_, v)| m.max(v.abs()));
    let norm = scale * centered.iter().map(|(_, v)| (v / scale).powi(2)).sum::<f64>().sqrt();
    centered.into_iter().map(|(u, v)| (u, v / norm)).collect()
}
