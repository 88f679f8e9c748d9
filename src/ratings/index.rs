use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Key;

/// Assigns dense contiguous indices to sparse user or item keys.
///
/// Indices are handed out in first-seen order starting at zero.
#[derive(Debug, Clone)]
pub struct KeyIndex<K: Key> {
    keys: Vec<K>,
    lookup: HashMap<K, usize>,
}

impl<K: Key> Default for KeyIndex<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<K: Key> KeyIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from keys in index order. Fails on a repeated key.
    pub fn from_keys(keys: Vec<K>) -> std::result::Result<Self, String> {
        let mut lookup = HashMap::with_capacity(keys.len());
        for (idx, key) in keys.iter().enumerate() {
            if lookup.insert(key.clone(), idx).is_some() {
                return Err(format!("key {:?} appears more than once", key));
            }
        }
        Ok(Self { keys, lookup })
    }

    /// Return the index of `key`, assigning the next free one if unseen.
    pub fn intern(&mut self, key: K) -> usize {
        if let Some(&idx) = self.lookup.get(&key) {
            return idx;
        }
        let idx = self.keys.len();
        self.keys.push(key.clone());
        self.lookup.insert(key, idx);
        idx
    }

    /// Look up the index of a key.
    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.get(key).copied()
    }

    /// Resolve an index back to its key.
    pub fn key(&self, idx: usize) -> Option<&K> {
        self.keys.get(idx)
    }

    /// All keys in index order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been assigned.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// Serialized as the key list; the lookup table is rebuilt on load.
impl<K: Key + Serialize> Serialize for KeyIndex<K> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.keys.serialize(serializer)
    }
}

impl<'de, K: Key + Deserialize<'de>> Deserialize<'de> for KeyIndex<K> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keys = Vec::<K>::deserialize(deserializer)?;
        KeyIndex::from_keys(keys).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_contiguous_indices_in_first_seen_order() {
        let mut idx = KeyIndex::new();
        assert_eq!(idx.intern("b".to_string()), 0);
        assert_eq!(idx.intern("a".to_string()), 1);
        assert_eq!(idx.intern("b".to_string()), 0);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get("a"), Some(1));
        assert_eq!(idx.get("zzz"), None);
        assert_eq!(idx.key(0).map(String::as_str), Some("b"));
        assert_eq!(idx.key(2), None);
    }

    #[test]
    fn from_keys_rejects_repeats() {
        assert!(KeyIndex::from_keys(vec![1u32, 2, 1]).is_err());
        let idx = KeyIndex::from_keys(vec![7u32, 3]).unwrap();
        assert_eq!(idx.get(&3), Some(1));
    }

    #[test]
    fn serializes_as_key_list() {
        let mut idx = KeyIndex::new();
        idx.intern(42u64);
        idx.intern(7u64);
        let json = serde_json::to_string(&idx).unwrap();
        assert_eq!(json, "[42,7]");
        let back: KeyIndex<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&7), Some(1));
    }
}
