//! Record store: the arena that owns every entry.
//!
//! Each record carries its own links for both structures threaded through
//! the store: the singly linked bucket chain (`chain_next`) and the doubly
//! linked insertion order (`prev`/`next`). Links are generational arena keys,
//! so a link can never resolve to a record that replaced a removed one.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable, generational address of a record in the store.
    pub(crate) struct RecordKey;
}

#[derive(Clone, Debug)]
pub(crate) struct Record<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Hash computed once at insertion; rehashing only re-reduces it.
    pub(crate) hash: u64,
    pub(crate) chain_next: Option<RecordKey>,
    pub(crate) prev: Option<RecordKey>,
    pub(crate) next: Option<RecordKey>,
}

impl<K, V> Record<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            chain_next: None,
            prev: None,
            next: None,
        }
    }
}

pub(crate) type Records<K, V> = SlotMap<RecordKey, Record<K, V>>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a removed record's key does not resolve, even after its slot
    /// is reused by a new record.
    #[test]
    fn removed_key_never_aliases() {
        let mut store: Records<&str, i32> = SlotMap::with_key();
        let a = store.insert(Record::new("a", 1, 7));
        assert!(store.remove(a).is_some());
        let b = store.insert(Record::new("b", 2, 9));
        assert_ne!(a, b);
        assert!(store.get(a).is_none());
        assert_eq!(store[b].key, "b");
        assert!(store[b].chain_next.is_none());
        assert!(store[b].prev.is_none() && store[b].next.is_none());
    }
}
