use std::collections::HashSet;

use crate::{
    errors::{KnnError, Result},
    ratings::{KeyIndex, RatingMatrix},
    types::{ItemIndex, Key, RatingRecord, UserIndex},
};

/// A validated rating set: key indices plus the sparse matrix they address.
#[derive(Debug, Clone)]
pub struct RatingSet<U: Key, I: Key> {
    users: KeyIndex<U>,
    items: KeyIndex<I>,
    matrix: RatingMatrix,
}

impl<U: Key, I: Key> RatingSet<U, I> {
    /// Index and validate a collection of rating records.
    ///
    /// Fails on empty input, on non-finite ratings, and on a repeated
    /// (user, item) pair.
    pub fn from_records<R>(records: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: Into<RatingRecord<U, I>>,
    {
        let mut users = KeyIndex::new();
        let mut items = KeyIndex::new();
        let mut entries: Vec<(UserIndex, ItemIndex, f64)> = Vec::new();
        let mut seen: HashSet<(UserIndex, ItemIndex)> = HashSet::new();

        for record in records {
            let RatingRecord { user, item, rating } = record.into();
            if !rating.is_finite() {
                return Err(KnnError::Ratings(format!(
                    "non-finite rating {} for user {:?} and item {:?}",
                    rating, user, item
                )));
            }

            let u = users.intern(user);
            let i = items.intern(item);
            if !seen.insert((u, i)) {
                return Err(KnnError::DuplicateRating {
                    user: describe(users.key(u)),
                    item: describe(items.key(i)),
                });
            }
            entries.push((u, i, rating));
        }

        if entries.is_empty() {
            return Err(KnnError::EmptyInput);
        }

        let matrix = RatingMatrix::from_entries(users.len(), items.len(), &entries);
        Ok(Self {
            users,
            items,
            matrix,
        })
    }

    /// User key index.
    pub fn users(&self) -> &KeyIndex<U> {
        &self.users
    }

    /// Item key index.
    pub fn items(&self) -> &KeyIndex<I> {
        &self.items
    }

    /// The indexed rating matrix.
    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    /// Split into key indices and matrix.
    pub fn into_parts(self) -> (KeyIndex<U>, KeyIndex<I>, RatingMatrix) {
        (self.users, self.items, self.matrix)
    }
}

fn describe<K: Key>(key: Option<&K>) -> String {
    key.map(|k| format!("{:?}", k)).unwrap_or_default()
}
