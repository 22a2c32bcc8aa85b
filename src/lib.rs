//! chain-hashmap: A separately chained hash map that remembers insertion
//! order and hands out detached, container-aware positions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an unordered associative container whose storage, hashing and
//!   ordering are each small enough to check on their own.
//! - Layers:
//!   - Record store: a generational `SlotMap` owning every `(K, V)` with its
//!     cached hash and the links that thread it through the other layers.
//!   - BucketIndex: one chain head per bucket; records are linked into the
//!     chain their hash selects, newest first.
//!   - OrderList: a doubly linked list over the same records in insertion
//!     order; iteration and positions walk this list only.
//!   - ChainHashMap<K, V, S>: public API tying the three together, plus
//!     rehash, cursors and the std iterator family.
//!
//! Constraints
//! - Keys are unique. Overwriting a value keeps the entry's order slot.
//! - After inserting a new entry, `len / capacity <= max_load_factor`.
//! - Rehashing relinks records; it never moves or reorders them, so
//!   positions and iteration order survive it.
//! - No unsafe code.
//!
//! Positions
//! - A `Position` is `Copy` and holds no borrow. It names its map by a
//!   process-unique identity and its entry by a generational key.
//! - Using a position with another map reports `WrongMap`; using one whose
//!   entry was removed reports `Stale`. Neither can alias a newer entry.
//! - `take`/`assign_from`/`swap` carry the identity with the contents, so
//!   positions follow their entries into the destination map.
//! - The end position of a map sits one past its last entry. Stepping back
//!   from it reaches the last entry and stepping forward leaves it at the
//!   end; stepping back from the first entry is `OutOfRange`.
//!
//! Hasher and rehashing invariants
//! - Each record stores a precomputed `u64` hash and indexing always uses
//!   the stored hash; `K: Hash` is never invoked after insertion, and a
//!   rehash performs no hashing at all.
//! - The new bucket array is allocated before any record is relinked, so a
//!   failed `try_rehash`/`try_reserve` leaves the map untouched.
//!
//! Notes and non-goals
//! - Single-threaded: no interior locking. The map is `Send`/`Sync` exactly
//!   when its keys, values and hasher are.
//! - Keys are immutable post-insert; there is no `key_mut`.
//! - No equal-range or multi-key variants.

#![forbid(unsafe_code)]

mod buckets;
mod chain_hash_map;
mod chain_hash_map_proptest;
mod config;
mod cursor;
mod error;
mod invariants;
pub mod iter;
mod order;
mod record;
mod rehash;

// Public surface
pub use chain_hash_map::ChainHashMap;
pub use config::{Growth, MapConfig};
pub use cursor::{Cursor, CursorMut, Position};
pub use error::{ConfigError, CursorError, RehashError};
pub use iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
