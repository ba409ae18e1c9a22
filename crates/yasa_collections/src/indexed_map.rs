use std::hash::Hash;
use std::{borrow::Borrow, collections::HashMap, ops::Index};

/// A map which keeps values in a dense vector in insertion order, and
/// a mapping from the key to the index in that vector.
///
/// Indices are stable for the lifetime of the map, so they can be used as
/// cheap handles into the stored values.
#[derive(Debug, Clone)]
pub struct IndexedMap<K, V> {
    index_to_value: Vec<(K, V)>,
    key_to_index: HashMap<K, usize>,
}

impl<K, V> Default for IndexedMap<K, V> {
    fn default() -> Self {
        Self {
            index_to_value: Default::default(),
            key_to_index: Default::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> IndexedMap<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index_to_value: Vec::with_capacity(capacity),
            key_to_index: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index_to_value.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_value.is_empty()
    }

    /// Inserts a value, overwriting the existing one under the same key.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        match self.key_to_index.get(&key) {
            Some(&index) => {
                self.index_to_value[index].1 = value;
                index
            }
            None => self.push(key, value),
        }
    }

    /// Inserts a value only if the key is vacant. When the key is already
    /// taken, the map is left untouched and the pair is handed back.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<usize, (K, V)> {
        match self.key_to_index.contains_key(&key) {
            true => Err((key, value)),
            false => Ok(self.push(key, value)),
        }
    }

    fn push(&mut self, key: K, value: V) -> usize {
        let index = self.index_to_value.len();
        self.key_to_index.insert(key.clone(), index);
        self.index_to_value.push((key, value));
        index
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.index_to_value.get(index).map(|(_, v)| v)
    }

    pub fn get_by_key<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get_index(key).map(|index| &self.index_to_value[index].1)
    }

    pub fn get_index<Q: ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.key_to_index.get(key).cloned()
    }

    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.key_to_index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index_to_value.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.index_to_value.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.index_to_value.iter().map(|(k, v)| (k, v))
    }
}

impl<K, V> Index<usize> for IndexedMap<K, V> {
    type Output = V;

    fn index(&self, index: usize) -> &Self::Output {
        &self.index_to_value[index].1
    }
}
