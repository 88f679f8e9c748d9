use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Result;
use crate::types::RatingRecord;

/// A user or item identifier as it appears in the input. Numeric ids are
/// kept as their decimal text so that all keys share one type.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Int(i64),
}

impl From<RawKey> for String {
    fn from(key: RawKey) -> Self {
        match key {
            RawKey::Text(s) => s,
            RawKey::Int(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    user: RawKey,
    item: RawKey,
    rating: f64,
}

/// Reader for line-delimited JSON rating files.
///
/// Each non-blank line holds one object:
/// `{"user": "u1", "item": 42, "rating": 4.5}`.
#[derive(Debug)]
pub struct JsonlRatings {
    path: PathBuf,
}

impl JsonlRatings {
    /// Create a reader for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over records in the file.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<RatingRecord<String, String>>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        Ok(reader
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|line| {
                let line = line?;
                let raw: RawRecord = serde_json::from_str(&line)?;
                Ok(RatingRecord::new(raw.user.into(), raw.item.into(), raw.rating))
            }))
    }

    /// Read every record, stopping at the first malformed line.
    pub fn read_all(&self) -> Result<Vec<RatingRecord<String, String>>> {
        self.iter()?.collect()
    }
}
