//! Rehash controller: load-factor checks, growth, and rebuilding the bucket
//! index from the order list.
//!
//! A rebuild allocates the new bucket array before touching any link, so an
//! allocation failure leaves the map exactly as it was. Records are never
//! created, destroyed or reordered here; only their `chain_next` links and
//! the bucket heads change.

use crate::buckets::{BucketIndex, MAX_BUCKETS};
use crate::chain_hash_map::ChainHashMap;
use crate::error::RehashError;

impl<K, V, S> ChainHashMap<K, V, S> {
    #[inline]
    fn over_limit(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > self.config.max_load_factor
    }

    /// Bucket count needed to hold `len` entries within the load limit.
    fn capacity_for(&self, len: usize) -> usize {
        let needed = (len as f64 / self.config.max_load_factor).ceil();
        if needed >= usize::MAX as f64 {
            usize::MAX
        } else {
            (needed as usize).max(1)
        }
    }

    /// Bucket count automatic growth settles on for `len` entries. Stops at
    /// `MAX_BUCKETS`, leaving the map above its load limit rather than
    /// requesting an unaddressable array.
    fn growth_target(&self, len: usize) -> usize {
        let mut target = self.capacity();
        while self.over_limit(len, target) && target < MAX_BUCKETS {
            target = self.config.growth.next(target).min(MAX_BUCKETS);
        }
        target
    }

    /// Called after every insert that created a record.
    pub(crate) fn grow_if_needed(&mut self) {
        let target = self.growth_target(self.len());
        if target != self.capacity() {
            self.rebuild(BucketIndex::with_capacity(target));
        }
    }

    /// Rebuild the bucket index with `capacity` buckets (zero is treated as
    /// one). May leave the map above its load limit until the next insert.
    pub fn rehash(&mut self, capacity: usize) {
        self.rebuild(BucketIndex::with_capacity(capacity.max(1)));
    }

    /// Like [`rehash`](Self::rehash), but reports allocation failure and
    /// leaves the map untouched in that case.
    pub fn try_rehash(&mut self, capacity: usize) -> Result<(), RehashError> {
        let fresh = BucketIndex::try_with_capacity(capacity.max(1))?;
        self.rebuild(fresh);
        Ok(())
    }

    /// Pre-size so that `additional` further inserts cause no rehash.
    pub fn reserve(&mut self, additional: usize) {
        let wanted = self.capacity_for(self.len().saturating_add(additional));
        if wanted > self.capacity() {
            self.rehash(wanted);
        }
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), RehashError> {
        let wanted = self.capacity_for(self.len().saturating_add(additional));
        if wanted > self.capacity() {
            self.try_rehash(wanted)?;
        }
        Ok(())
    }

    /// Re-thread every record onto `fresh` by walking the order list once.
    fn rebuild(&mut self, mut fresh: BucketIndex) {
        tracing::debug!(
            from = self.capacity(),
            to = fresh.capacity(),
            len = self.len(),
            "rehash"
        );
        let mut cur = self.order.head;
        while let Some(k) = cur {
            cur = self.records[k].next;
            fresh.push_front(&mut self.records, k);
        }
        self.buckets = fresh;
    }
}

#[cfg(test)]
mod tests {
    use crate::buckets::MAX_BUCKETS;
    use crate::config::{Growth, MapConfig};
    use crate::error::RehashError;
    use crate::ChainHashMap;

    fn order<V, S>(m: &ChainHashMap<u32, V, S>) -> Vec<u32> {
        m.keys().copied().collect()
    }

    /// Invariant: automatic growth keeps `len / capacity` within the limit
    /// after every insert, and follows the configured policy.
    #[test]
    fn automatic_growth_respects_limit() {
        let mut m: ChainHashMap<u32, u32> = ChainHashMap::with_capacity_and_load(5, 0.75).unwrap();
        let mut caps = vec![m.capacity()];
        for i in 0..20 {
            m.insert(i, i * 2);
            assert!(m.load_factor() <= 0.75, "load {} after {} inserts", m.load_factor(), i + 1);
            if *caps.last().unwrap() != m.capacity() {
                caps.push(m.capacity());
            }
        }
        assert_eq!(caps, vec![5, 11, 23, 47]);
        for i in 0..20 {
            assert_eq!(m.get(&i), Some(&(i * 2)));
        }
        m.assert_consistent();
    }

    #[test]
    fn double_growth_policy() {
        let cfg = MapConfig::new()
            .initial_capacity(4)
            .max_load_factor(1.0)
            .growth(Growth::Double);
        let mut m: ChainHashMap<u32, ()> = ChainHashMap::with_config(cfg).unwrap();
        m.extend((0..5).map(|i| (i, ())));
        assert_eq!(m.capacity(), 8);
    }

    /// Invariant: manual rehash, up or down, keeps content and iteration order.
    #[test]
    fn manual_rehash_preserves_content_and_order() {
        let mut m: ChainHashMap<u32, String> = ChainHashMap::new();
        for i in [9, 3, 7, 1, 5] {
            m.insert(i, i.to_string());
        }
        m.remove(&7);
        let before = order(&m);

        m.rehash(101);
        assert_eq!(m.capacity(), 101);
        assert_eq!(order(&m), before);
        m.assert_consistent();

        m.rehash(1);
        assert_eq!(m.capacity(), 1);
        assert_eq!(order(&m), before);
        assert_eq!(m.get(&3).map(String::as_str), Some("3"));
        m.assert_consistent();

        m.rehash(0);
        assert_eq!(m.capacity(), 1);

        // Next insert restores the load limit.
        m.insert(42, "42".into());
        assert!(m.load_factor() <= m.max_load_factor());
        assert_eq!(order(&m), vec![9, 3, 1, 5, 42]);
        m.assert_consistent();
    }

    #[test]
    fn reserve_avoids_rehash_during_inserts() {
        let mut m: ChainHashMap<u32, u32> = ChainHashMap::with_capacity_and_load(2, 0.5).unwrap();
        m.reserve(100);
        let cap = m.capacity();
        assert!(cap >= 200);
        m.extend((0..100).map(|i| (i, i)));
        assert_eq!(m.capacity(), cap);
        assert!(m.try_reserve(10).is_ok());
        m.assert_consistent();
    }

    #[test]
    fn try_rehash_reports_allocation_failure() {
        let mut m: ChainHashMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
        let cap = m.capacity();
        assert!(m.try_rehash(usize::MAX).is_err());
        assert_eq!(m.capacity(), cap);
        assert_eq!(order(&m), (0..10).collect::<Vec<_>>());
        m.assert_consistent();
        assert!(m.try_rehash(64).is_ok());
        assert_eq!(m.capacity(), 64);
    }

    #[test]
    fn try_reserve_reports_allocation_failure() {
        let mut m: ChainHashMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
        let cap = m.capacity();
        let p = m.find(&4);
        assert!(matches!(m.try_reserve(usize::MAX), Err(RehashError::Alloc(_))));
        assert_eq!(m.capacity(), cap);
        assert_eq!(m.len(), 10);
        assert_eq!(order(&m), (0..10).collect::<Vec<_>>());
        assert_eq!(m.entry_at(p), Ok((&4, &4)));
        m.assert_consistent();
    }

    /// Invariant: the smallest accepted load factor grows to an allocatable
    /// bucket count on the first insert instead of overflowing.
    #[test]
    fn minimum_load_factor_first_insert() {
        let cfg = MapConfig::new().max_load_factor(MapConfig::MIN_MAX_LOAD_FACTOR);
        let mut m: ChainHashMap<u32, u32> = ChainHashMap::with_config(cfg).unwrap();
        assert_eq!(m.insert(1, 1), None);
        assert!(m.capacity() >= 1_000_000);
        assert!(m.load_factor() <= m.max_load_factor());
        assert_eq!(m.get(&1), Some(&1));
        m.assert_consistent();
    }

    /// Invariant: automatic growth never targets more buckets than a `Vec`
    /// can address, however many entries are counted.
    #[test]
    fn growth_target_is_capped() {
        let m: ChainHashMap<u32, u32> = ChainHashMap::new();
        assert_eq!(m.growth_target(usize::MAX), MAX_BUCKETS);
        assert_eq!(m.growth_target(5), m.capacity());
        assert_eq!(m.growth_target(12), 23);
    }
}
