use serde::{Deserialize, Serialize};
use sprs::{CsMat, TriMat};

use crate::types::{ItemIndex, UserIndex};

/// Sparse users x items rating matrix addressed by dense indices.
///
/// Stored twice: column-major for per-item scans and row-major for per-user
/// scans. Both views hold the same entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "MatrixParts", try_from = "MatrixParts")]
pub struct RatingMatrix {
    by_item: CsMat<f64>,
    by_user: CsMat<f64>,
}

impl RatingMatrix {
    /// Build a matrix of the given shape from `(user, item, value)` entries.
    ///
    /// Entries must be in bounds and each (user, item) pair must appear at
    /// most once.
    pub fn from_entries(n_users: usize, n_items: usize, entries: &[(UserIndex, ItemIndex, f64)]) -> Self {
        let mut tri = TriMat::with_capacity((n_users, n_items), entries.len());
        for &(user, item, value) in entries {
            tri.add_triplet(user, item, value);
        }
        let by_item: CsMat<f64> = tri.to_csc();
        let by_user: CsMat<f64> = by_item.to_other_storage();
        Self { by_item, by_user }
    }

    /// Number of users (rows).
    pub fn n_users(&self) -> usize {
        self.by_item.rows()
    }

    /// Number of items (columns).
    pub fn n_items(&self) -> usize {
        self.by_item.cols()
    }

    /// Number of stored ratings.
    pub fn nnz(&self) -> usize {
        self.by_item.nnz()
    }

    /// `(user, value)` pairs of one item column. Empty for an out-of-range item.
    pub fn item_column(&self, item: ItemIndex) -> impl Iterator<Item = (UserIndex, f64)> + '_ {
        outer_slice(&self.by_item, item)
    }

    /// `(item, value)` pairs of one user row. Empty for an out-of-range user.
    pub fn user_row(&self, user: UserIndex) -> impl Iterator<Item = (ItemIndex, f64)> + '_ {
        outer_slice(&self.by_user, user)
    }

    /// Single entry lookup.
    pub fn get(&self, user: UserIndex, item: ItemIndex) -> Option<f64> {
        self.user_row(user)
            .find(|&(i, _)| i == item)
            .map(|(_, value)| value)
    }

    /// All entries as `(user, item, value)`, ordered by item then user.
    pub fn entries(&self) -> Vec<(UserIndex, ItemIndex, f64)> {
        (0..self.n_items())
            .flat_map(|item| self.item_column(item).map(move |(user, value)| (user, item, value)))
            .collect()
    }
}

fn outer_slice(mat: &CsMat<f64>, outer: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
    let range = if outer < mat.outer_dims() {
        mat.indptr().outer_inds_sz(outer)
    } else {
        0..0
    };
    let inner = &mat.indices()[range.clone()];
    let values = &mat.data()[range];
    inner.iter().copied().zip(values.iter().copied())
}

/// Triplet form used for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct MatrixParts {
    n_users: usize,
    n_items: usize,
    entries: Vec<(UserIndex, ItemIndex, f64)>,
}

impl From<RatingMatrix> for MatrixParts {
    fn from(matrix: RatingMatrix) -> Self {
        Self {
            n_users: matrix.n_users(),
            n_items: matrix.n_items(),
            entries: matrix.entries(),
        }
    }
}

impl TryFrom<MatrixParts> for RatingMatrix {
    type Error = String;

    fn try_from(parts: MatrixParts) -> Result<Self, Self::Error> {
        if let Some(&(user, item, _)) = parts
            .entries
            .iter()
            .find(|&&(user, item, _)| user >= parts.n_users || item >= parts.n_items)
        {
            return Err(format!(
                "entry ({}, {}) out of bounds for {}x{} matrix",
                user, item, parts.n_users, parts.n_items
            ));
        }
        Ok(RatingMatrix::from_entries(parts.n_users, parts.n_items, &parts.entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RatingMatrix {
        // users 0..3, items 0..2
        RatingMatrix::from_entries(
            3,
            2,
            &[(0, 0, 4.0), (1, 0, 2.0), (0, 1, 5.0), (2, 1, 1.0)],
        )
    }

    #[test]
    fn shape_and_counts() {
        let m = sample();
        assert_eq!(m.n_users(), 3);
        assert_eq!(m.n_items(), 2);
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.item_column(0).count(), 2);
        assert_eq!(m.item_column(9).count(), 0);
    }

    #[test]
    fn columns_and_rows_agree() {
        let m = sample();
        let mut col: Vec<_> = m.item_column(1).collect();
        col.sort_by_key(|&(u, _)| u);
        assert_eq!(col, vec![(0, 5.0), (2, 1.0)]);

        let mut row: Vec<_> = m.user_row(0).collect();
        row.sort_by_key(|&(i, _)| i);
        assert_eq!(row, vec![(0, 4.0), (1, 5.0)]);

        assert_eq!(m.get(1, 0), Some(2.0));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.user_row(17).count(), 0);
    }

    #[test]
    fn survives_json_round_trip() {
        let m = sample();
        let json = serde_json::to_string(&m).unwrap();
        let back: RatingMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nnz(), 4);
        assert_eq!(back.get(2, 1), Some(1.0));
    }

    #[test]
    fn rejects_out_of_bounds_parts() {
        let json = r#"{"n_users":1,"n_items":1,"entries":[[0,3,1.0]]}"#;
        assert!(serde_json::from_str::<RatingMatrix>(json).is_err());
    }
}
