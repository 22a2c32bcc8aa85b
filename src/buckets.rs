//! Bucket index: one chain head per slot, chains threaded through the
//! records' `chain_next` links. Slots never own records.

use crate::record::{RecordKey, Records};
use core::borrow::Borrow;
use std::collections::TryReserveError;
use std::mem;

/// Largest bucket array a `Vec` can address.
pub(crate) const MAX_BUCKETS: usize = isize::MAX as usize / mem::size_of::<Option<RecordKey>>();

#[derive(Clone, Debug)]
pub(crate) struct BucketIndex {
    heads: Vec<Option<RecordKey>>,
}

impl BucketIndex {
    /// Callers clamp `capacity` to at least one.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            heads: vec![None; capacity],
        }
    }

    /// Like `with_capacity`, but reports allocation failure instead of aborting.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        debug_assert!(capacity > 0);
        let mut heads = Vec::new();
        heads.try_reserve_exact(capacity)?;
        heads.resize(capacity, None);
        Ok(Self { heads })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn slot_of(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    /// Thread `k` onto the head of the chain its cached hash selects.
    pub(crate) fn push_front<K, V>(&mut self, records: &mut Records<K, V>, k: RecordKey) {
        let slot = self.slot_of(records[k].hash);
        records[k].chain_next = self.heads[slot].replace(k);
    }

    /// Scan the chain for `hash` and return the record whose key equals `q`.
    pub(crate) fn find<K, V, Q>(&self, records: &Records<K, V>, hash: u64, q: &Q) -> Option<RecordKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.heads[self.slot_of(hash)];
        while let Some(k) = cur {
            let r = &records[k];
            if r.hash == hash && r.key.borrow() == q {
                return Some(k);
            }
            cur = r.chain_next;
        }
        None
    }

    /// Splice `k` out of its chain. Returns false if it was not chained.
    pub(crate) fn unlink<K, V>(&mut self, records: &mut Records<K, V>, k: RecordKey) -> bool {
        let slot = self.slot_of(records[k].hash);
        let after = records[k].chain_next.take();

        if self.heads[slot] == Some(k) {
            self.heads[slot] = after;
            return true;
        }

        let mut cur = self.heads[slot];
        while let Some(c) = cur {
            if records[c].chain_next == Some(k) {
                records[c].chain_next = after;
                return true;
            }
            cur = records[c].chain_next;
        }
        false
    }

    pub(crate) fn clear(&mut self) {
        self.heads.fill(None);
    }

    /// Records chained at `slot`, head first.
    #[cfg(test)]
    pub(crate) fn chain<'a, K, V>(
        &self,
        records: &'a Records<K, V>,
        slot: usize,
    ) -> impl Iterator<Item = RecordKey> + 'a {
        let mut cur = self.heads[slot];
        std::iter::from_fn(move || {
            let k = cur?;
            cur = records[k].chain_next;
            Some(k)
        })
    }
}
