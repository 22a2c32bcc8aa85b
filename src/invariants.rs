#![cfg(test)]

// Structural consistency walker used by the unit and property tests. It
// checks, against the raw store:
// - the order list is a well-formed doubly linked list over every record,
//   with head/tail matching its ends;
// - every record is chained exactly once, in the bucket its hash selects,
//   and its cached hash matches the map's hasher;
// - keys are unique and each resolves to its own record.

use crate::chain_hash_map::ChainHashMap;
use crate::record::RecordKey;
use core::hash::{BuildHasher, Hash};
use slotmap::SecondaryMap;

impl<K, V, S> ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn assert_consistent(&self) {
        let n = self.records.len();

        let mut listed: SecondaryMap<RecordKey, ()> = SecondaryMap::new();
        let mut prev = None;
        let mut cur = self.order.head;
        while let Some(k) = cur {
            let r = self.records.get(k).expect("order link to a dead record");
            assert_eq!(r.prev, prev, "broken prev link");
            assert!(listed.insert(k, ()).is_none(), "order list cycles");
            prev = Some(k);
            cur = r.next;
        }
        assert_eq!(self.order.tail, prev, "tail is not the last listed record");
        assert_eq!(listed.len(), n, "order list does not cover the store");

        let mut chained: SecondaryMap<RecordKey, ()> = SecondaryMap::new();
        for slot in 0..self.buckets.capacity() {
            for k in self.buckets.chain(&self.records, slot) {
                let r = &self.records[k];
                assert_eq!(self.buckets.slot_of(r.hash), slot, "record in wrong bucket");
                assert_eq!(self.make_hash(&r.key), r.hash, "stale cached hash");
                assert!(chained.insert(k, ()).is_none(), "record chained twice");
            }
        }
        assert_eq!(chained.len(), n, "bucket chains do not cover the store");

        for (k, r) in self.records.iter() {
            assert_eq!(self.locate(&r.key), Some(k), "duplicate or unreachable key");
        }
    }
}
