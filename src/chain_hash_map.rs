//! ChainHashMap: the public façade over the record store, the bucket index
//! and the global order list.
//!
//! Every mutating method leaves the three structures mutually consistent:
//! a record is chained in exactly one bucket, linked at exactly one place in
//! the order list, and owned only by the store.

use crate::buckets::BucketIndex;
use crate::config::MapConfig;
use crate::cursor::{MapId, Position};
use crate::error::ConfigError;
use crate::order::OrderList;
use crate::record::{Record, RecordKey, Records};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::SlotMap;

pub struct ChainHashMap<K, V, S = DefaultHashBuilder> {
    pub(crate) records: Records<K, V>,
    pub(crate) buckets: BucketIndex,
    pub(crate) order: OrderList,
    pub(crate) hasher: S,
    pub(crate) config: MapConfig,
    pub(crate) id: MapId,
}

impl<K, V> ChainHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// `capacity` is the initial bucket count; zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(
            MapConfig::default().initial_capacity(capacity.max(1)),
            Default::default(),
        )
    }

    pub fn with_capacity_and_load(capacity: usize, max_load_factor: f64) -> Result<Self, ConfigError> {
        Self::with_config(
            MapConfig::default()
                .initial_capacity(capacity)
                .max_load_factor(max_load_factor),
        )
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V> Default for ChainHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainHashMap<K, V, S> {
    /// Assumes `config` has been validated.
    pub(crate) fn from_parts(config: MapConfig, hasher: S) -> Self {
        Self {
            records: SlotMap::with_key(),
            buckets: BucketIndex::with_capacity(config.initial_capacity),
            order: OrderList::default(),
            hasher,
            config,
            id: MapId::fresh(),
        }
    }

    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(MapConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.config.max_load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        tracing::trace!(len = self.len(), capacity = self.capacity(), "clear");
        self.records.clear();
        self.buckets.clear();
        self.order.clear();
    }

    /// First entry in insertion order.
    pub fn front(&self) -> Option<(&K, &V)> {
        let r = &self.records[self.order.head?];
        Some((&r.key, &r.value))
    }

    /// Last entry in insertion order.
    pub fn back(&self) -> Option<(&K, &V)> {
        let r = &self.records[self.order.tail?];
        Some((&r.key, &r.value))
    }

    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let k = self.order.head?;
        self.unlink(k)
    }

    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let k = self.order.tail?;
        self.unlink(k)
    }

    /// Keep only the entries for which `f` returns true. Visits entries in
    /// insertion order; survivors keep their relative order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cur = self.order.head;
        while let Some(k) = cur {
            let r = &mut self.records[k];
            cur = r.next;
            if !f(&r.key, &mut r.value) {
                drop(self.unlink(k));
            }
        }
    }

    /// Exchange the whole state of two maps, identities included. No record
    /// is touched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Remove `k` from both linkage structures, then from the store.
    pub(crate) fn unlink(&mut self, k: RecordKey) -> Option<(K, V)> {
        if !self.records.contains_key(k) {
            return None;
        }
        let chained = self.buckets.unlink(&mut self.records, k);
        debug_assert!(chained, "live record missing from its bucket chain");
        self.order.unlink(&mut self.records, k);
        self.records.remove(k).map(|r| (r.key, r.value))
    }

    /// Append records cloned from `source` in its order, chaining them under
    /// this map's current bucket index.
    fn append_cloned(&mut self, source: &Self)
    where
        K: Clone,
        V: Clone,
    {
        for sk in source.order.keys(&source.records) {
            let r = &source.records[sk];
            let k = self
                .records
                .insert(Record::new(r.key.clone(), r.value.clone(), r.hash));
            self.buckets.push_front(&mut self.records, k);
            self.order.push_back(&mut self.records, k);
        }
    }
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    S: Clone,
{
    /// Move the contents out, leaving `self` empty with its configured
    /// initial bucket count. The returned map keeps this map's identity, so
    /// positions taken before the move resolve against it; `self` gets a
    /// fresh identity and rejects them.
    pub fn take(&mut self) -> Self {
        tracing::trace!(len = self.len(), "move out");
        let empty = Self::from_parts(self.config, self.hasher.clone());
        mem::replace(self, empty)
    }

    /// Replace the contents of `self` with those of `other`, leaving `other`
    /// empty as by [`take`](Self::take).
    pub fn assign_from(&mut self, other: &mut Self) {
        *self = other.take();
    }
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub(crate) fn locate<Q>(&self, q: &Q) -> Option<RecordKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.buckets.find(&self.records, hash, q)
    }

    /// Chain and append a new record, then apply the load-factor check.
    fn link_new(&mut self, key: K, value: V, hash: u64) -> RecordKey {
        let k = self.records.insert(Record::new(key, value, hash));
        self.buckets.push_front(&mut self.records, k);
        self.order.push_back(&mut self.records, k);
        self.grow_if_needed();
        k
    }

    /// Insert or overwrite. An overwrite keeps the entry's place in the
    /// iteration order and returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        if let Some(k) = self.buckets.find(&self.records, hash, &key) {
            return Some(mem::replace(&mut self.records[k].value, value));
        }
        self.link_new(key, value, hash);
        None
    }

    /// Value for `key`, inserting the result of `default()` first if absent.
    /// `default` only runs when an insert happens.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let k = match self.buckets.find(&self.records, hash, &key) {
            Some(k) => k,
            None => self.link_new(key, default(), hash),
        };
        &mut self.records[k].value
    }

    /// Indexed access: the value for `key`, default-inserted if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Position of `q`'s entry, or `end()` when absent.
    pub fn find<Q>(&self, q: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Position::new(self.id, self.locate(q))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).map(|k| &self.records[k].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.locate(q)?;
        Some(&mut self.records[k].value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).map(|k| {
            let r = &self.records[k];
            (&r.key, &r.value)
        })
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).is_some()
    }

    /// Erase `q` if present. An absent key is a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.locate(q)?;
        self.unlink(k)
    }
}

impl<K, V, S> Clone for ChainHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Deep copy with a fresh record store, rebuilt chains, the same order
    /// and a new identity.
    fn clone(&self) -> Self {
        let mut out = Self {
            records: SlotMap::with_capacity_and_key(self.len()),
            buckets: BucketIndex::with_capacity(self.capacity()),
            order: OrderList::default(),
            hasher: self.hasher.clone(),
            config: self.config,
            id: MapId::fresh(),
        };
        out.append_cloned(self);
        out
    }

    /// Copy assignment. Keeps this map's identity; positions into the old
    /// contents become stale.
    fn clone_from(&mut self, source: &Self) {
        self.records.clear();
        self.order.clear();
        self.buckets = BucketIndex::with_capacity(source.capacity());
        self.hasher = source.hasher.clone();
        self.config = source.config;
        self.append_cloned(source);
    }
}

impl<K, V, S> fmt::Debug for ChainHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Maps are equal when they hold the same key/value pairs, in any order.
impl<K, V, S> PartialEq for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, Q, V, S> Index<&Q> for ChainHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not present in ChainHashMap")
    }
}
