//! Separate-chaining hash table with load-factor-driven growth.
//!
//! Variables:
//!   buckets  : Vec<Vec<(K, V)>>  : chains, length C (capacity)
//!   size     : usize             : live key count
//!   C        : usize             : capacity, power of two
//!
//! Equations:
//!   h(k)        = fold(h * 31 + byte) over the key's bytes, wrapping u32
//!   index(k)    = h(k) mod C
//!   load_factor = size / C
//!   grow when (size + 1) / C > threshold: C' = 2C, rehash every entry
//!
//! Invariant: after every `set`, `size / C <= threshold`.
//! Iteration order follows bucket order and is not insertion order.
//!
//! Domain views over this table live in the `views` submodule.

mod views;

pub use views::{EmployeeMap, GroupMap, TaskMap};

use std::borrow::Borrow;
use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollectionsConfig;

/// Keys the table can place into buckets.
///
/// The hash must be deterministic and consistent with `Eq`, and a borrowed
/// form (`str` for `String`) must hash identically to its owner.
pub trait TableKey: Eq {
    /// 32-bit hash of the key.
    fn table_hash(&self) -> u32;
}

#[inline]
fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(b as u32))
}

impl TableKey for str {
    fn table_hash(&self) -> u32 {
        hash_bytes(self.as_bytes())
    }
}

impl TableKey for String {
    fn table_hash(&self) -> u32 {
        self.as_str().table_hash()
    }
}

macro_rules! impl_table_key_int {
    ($($t:ty),*) => {
        $(
            impl TableKey for $t {
                fn table_hash(&self) -> u32 {
                    hash_bytes(self.to_string().as_bytes())
                }
            }
        )*
    };
}

impl_table_key_int!(u32, u64, usize, i32, i64);

/// Table contents plus the sizing it was created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashTableSnapshot<K, V> {
    pub initial_capacity: usize,
    pub load_factor_threshold: f64,
    pub entries: Vec<(K, V)>,
}

/// Generic key → value store with chained buckets and automatic growth.
#[derive(Debug, Clone)]
pub struct HashTable<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    size: usize,
    initial_capacity: usize,
    load_factor_threshold: f64,
}

impl<K: TableKey, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TableKey, V> HashTable<K, V> {
    /// Creates a table with the default configuration (16 buckets, 0.75).
    pub fn new() -> Self {
        Self::with_config(&CollectionsConfig::default())
    }

    /// Creates a table with `capacity` buckets (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&CollectionsConfig::default().with_initial_capacity(capacity))
    }

    /// Creates a table from a configuration.
    ///
    /// The configuration is expected to be validated; an out-of-range load
    /// factor is clamped into `(0, 1]`.
    pub fn with_config(config: &CollectionsConfig) -> Self {
        let capacity = config.bucket_count();
        let threshold = if config.load_factor_threshold > 0.0 {
            config.load_factor_threshold.min(1.0)
        } else {
            crate::config::DEFAULT_LOAD_FACTOR
        };
        Self {
            buckets: Self::empty_buckets(capacity),
            size: 0,
            initial_capacity: capacity,
            load_factor_threshold: threshold,
        }
    }

    fn empty_buckets(capacity: usize) -> Vec<Vec<(K, V)>> {
        (0..capacity).map(|_| Vec::new()).collect()
    }

    #[inline]
    fn index_of<Q>(&self, key: &Q) -> usize
    where
        Q: TableKey + ?Sized,
    {
        key.table_hash() as usize % self.buckets.len()
    }

    /// Inserts or overwrites. Returns the previous value for an existing key.
    ///
    /// Overwriting does not change `len()` and never triggers growth.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let index = self.index_of(&key);
        if let Some(slot) = self.buckets[index].iter_mut().find(|(k, _)| *k == key) {
            return Some(mem::replace(&mut slot.1, value));
        }

        if self.exceeds_threshold(self.size + 1) {
            self.resize();
        }

        let index = self.index_of(&key);
        self.buckets[index].push((key, value));
        self.size += 1;
        None
    }

    #[inline]
    fn exceeds_threshold(&self, size: usize) -> bool {
        size as f64 / self.buckets.len() as f64 > self.load_factor_threshold
    }

    /// Doubles capacity until the next insert fits, then rehashes every entry.
    fn resize(&mut self) {
        let old_capacity = self.buckets.len();
        let mut new_capacity = old_capacity * 2;
        while (self.size + 1) as f64 / new_capacity as f64 > self.load_factor_threshold {
            new_capacity *= 2;
        }

        let old = mem::replace(&mut self.buckets, Self::empty_buckets(new_capacity));
        for (key, value) in old.into_iter().flatten() {
            let index = self.index_of(&key);
            self.buckets[index].push((key, value));
        }

        debug!(
            old_capacity,
            new_capacity,
            size = self.size,
            "hash table resized"
        );
    }

    /// Looks up a value.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.buckets[self.index_of(key)]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Looks up a value for in-place mutation.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        let index = self.index_of(key);
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| (*k).borrow() == key)
            .map(|(_, v)| v)
    }

    /// Whether the key is present.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes a key. Returns whether a removal occurred.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes a key and returns its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        let index = self.index_of(key);
        let bucket = &mut self.buckets[index];
        let pos = bucket.iter().position(|(k, _)| k.borrow() == key)?;
        let (_, value) = bucket.swap_remove(pos);
        self.size -= 1;
        Some(value)
    }

    /// Removes every entry and shrinks back to the initial capacity.
    pub fn clear(&mut self) {
        self.buckets = Self::empty_buckets(self.initial_capacity);
        self.size = 0;
    }

    /// Number of live keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current bucket count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len() / capacity()`.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Growth threshold in effect.
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Iterates `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    /// Iterates keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates values in bucket order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Iterates values mutably in bucket order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.buckets
            .iter_mut()
            .flat_map(|bucket| bucket.iter_mut().map(|(_, v)| v))
    }

    /// Calls `visitor(key, value)` for every entry.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            visitor(k, v);
        }
    }
}

impl<K: TableKey + Clone, V: Clone> HashTable<K, V> {
    /// Every entry as an owned `(key, value)` list.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of the contents and the table's sizing.
    pub fn to_snapshot(&self) -> HashTableSnapshot<K, V> {
        HashTableSnapshot {
            initial_capacity: self.initial_capacity,
            load_factor_threshold: self.load_factor_threshold,
            entries: self.entries(),
        }
    }
}

impl<K: TableKey, V> HashTable<K, V> {
    pub fn from_snapshot(snapshot: HashTableSnapshot<K, V>) -> Self {
        let mut table = Self::new();
        table.restore(snapshot);
        table
    }

    /// Adopts the snapshot's sizing, then replays every entry.
    pub fn restore(&mut self, snapshot: HashTableSnapshot<K, V>) {
        let config = CollectionsConfig::default()
            .with_initial_capacity(snapshot.initial_capacity)
            .with_load_factor(snapshot.load_factor_threshold);
        *self = Self::with_config(&config);
        for (k, v) in snapshot.entries {
            self.set(k, v);
        }
    }
}

impl<K: TableKey, V> FromIterator<(K, V)> for HashTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn test_set_then_get() {
        let mut t: HashTable<String, i32> = HashTable::new();
        assert_eq!(t.set("a".to_string(), 1), None);
        assert_eq!(t.get("a"), Some(&1));
        assert_eq!(t.get("b"), None);
        assert!(t.has("a"));
        assert!(!t.has("b"));
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let mut t: HashTable<String, i32> = HashTable::new();
        t.set("a".into(), 1);
        t.set("b".into(), 2);
        assert_eq!(t.set("a".into(), 10), Some(1));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("a"), Some(&10));
    }

    #[test]
    fn test_set_then_delete_all() {
        let mut t: HashTable<String, usize> = HashTable::new();
        for i in 0..100 {
            t.set(format!("k{i}"), i);
        }
        assert_eq!(t.len(), 100);
        for i in 0..100 {
            assert!(t.delete(format!("k{i}").as_str()));
        }
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert!(!t.delete("k0"));
    }

    #[test]
    fn test_resize_doubles_and_preserves() {
        let mut t: HashTable<String, usize> = HashTable::with_capacity(16);
        for i in 0..12 {
            t.set(format!("k{i}"), i);
        }
        // 12 / 16 == 0.75 is still within the threshold
        assert_eq!(t.capacity(), 16);

        t.set("k12".into(), 12);
        assert_eq!(t.capacity(), 32);
        for i in 0..13 {
            assert_eq!(t.get(format!("k{i}").as_str()), Some(&i));
        }
        assert!(t.load_factor() <= t.load_factor_threshold());
    }

    #[test]
    fn test_load_factor_never_exceeded() {
        let mut t: HashTable<u64, u64> = HashTable::with_capacity(1);
        for i in 0..1000 {
            t.set(i, i * 2);
            assert!(t.load_factor() <= 0.75);
        }
        assert!(t.capacity().is_power_of_two());
    }

    #[test]
    fn test_clear_resets_capacity() {
        let mut t: HashTable<String, i32> = HashTable::with_capacity(4);
        for i in 0..20 {
            t.set(format!("k{i}"), i);
        }
        assert!(t.capacity() > 4);
        t.clear();
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.len(), 0);
        assert_eq!(t.get("k1"), None);
    }

    #[test]
    fn test_iteration_covers_all_entries() {
        let t: HashTable<String, i32> = (0..30).map(|i| (format!("k{i}"), i)).collect();
        let mut values: Vec<i32> = t.values().copied().collect();
        values.sort();
        assert_eq!(values, (0..30).collect::<Vec<_>>());
        assert_eq!(t.keys().count(), 30);

        let mut sum = 0;
        t.for_each(|_, v| sum += v);
        assert_eq!(sum, (0..30).sum::<i32>());
    }

    #[test]
    fn test_get_mut_and_take() {
        let mut t: HashTable<String, Vec<i32>> = HashTable::new();
        t.set("a".into(), vec![1]);
        t.get_mut("a").unwrap().push(2);
        assert_eq!(t.get("a"), Some(&vec![1, 2]));
        assert_eq!(t.take("a"), Some(vec![1, 2]));
        assert_eq!(t.take("a"), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let t: HashTable<String, i32> = (0..25).map(|i| (format!("k{i}"), i)).collect();
        let json = serde_json::to_string(&t.to_snapshot()).unwrap();
        let snapshot: HashTableSnapshot<String, i32> = serde_json::from_str(&json).unwrap();
        let restored = HashTable::from_snapshot(snapshot);

        assert_eq!(restored.len(), t.len());
        assert_eq!(restored.capacity(), t.capacity());
        for (k, v) in t.iter() {
            assert_eq!(restored.get(k.as_str()), Some(v));
        }
    }

    #[test]
    fn test_snapshot_keeps_sizing() {
        let cfg = CollectionsConfig::new()
            .with_initial_capacity(4)
            .with_load_factor(0.5);
        let mut t: HashTable<u32, u32> = HashTable::with_config(&cfg);
        t.set(1, 10);

        let mut restored: HashTable<u32, u32> = HashTable::new();
        restored.set(99, 0);
        restored.restore(t.to_snapshot());
        assert_eq!(restored.capacity(), 4);
        assert!((restored.load_factor_threshold() - 0.5).abs() < 1e-10);
        assert_eq!(restored.get(&1), Some(&10));
        assert!(!restored.has(&99));

        restored.set(2, 20);
        restored.set(3, 30);
        // 3 / 4 > 0.5 → grown
        assert_eq!(restored.capacity(), 8);
        restored.clear();
        assert_eq!(restored.capacity(), 4);
    }

    #[test]
    fn test_with_config() {
        let cfg = CollectionsConfig::new()
            .with_initial_capacity(5)
            .with_load_factor(0.5);
        let mut t: HashTable<String, i32> = HashTable::with_config(&cfg);
        assert_eq!(t.capacity(), 8);
        for i in 0..5 {
            t.set(format!("k{i}"), i);
        }
        // 5 / 8 > 0.5 → grown
        assert_eq!(t.capacity(), 16);
    }

    #[test]
    fn test_random_ops_match_std_map() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t: HashTable<String, u32> = HashTable::with_capacity(2);
        let mut reference: HashMap<String, u32> = HashMap::new();

        for _ in 0..2000 {
            let key = format!("k{}", rng.random_range(0..200));
            if rng.random_bool(0.6) {
                let v = rng.random_range(0..1000);
                assert_eq!(t.set(key.clone(), v), reference.insert(key, v));
            } else {
                assert_eq!(t.delete(key.as_str()), reference.remove(&key).is_some());
            }
            assert_eq!(t.len(), reference.len());
            assert!(t.load_factor() <= t.load_factor_threshold());
        }
        for (k, v) in &reference {
            assert_eq!(t.get(k.as_str()), Some(v));
        }
    }
}
