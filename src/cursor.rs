//! Bidirectional positions over the insertion order.
//!
//! `Position` is a detached, copyable token: the identity of the map that
//! produced it plus the record it points at (or nothing, for the end
//! position). Because it remembers its map, stepping back from the end can
//! resolve to the tail, and a position from another map, or one whose record
//! was removed, is reported instead of silently misread.
//!
//! `Cursor` and `CursorMut` are the borrowed forms; they hold the map, so
//! they need no identity checks.

use crate::chain_hash_map::ChainHashMap;
use crate::error::CursorError;
use crate::record::RecordKey;
use core::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a map instance; moves with its contents.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    pub(crate) fn fresh() -> Self {
        MapId(NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A place in a map's insertion order: an entry, or one past the last entry.
///
/// `Position::default()` is an end position attached to no map; it can be
/// compared but never stepped backward.
#[derive(Copy, Clone, Debug, Default)]
pub struct Position {
    owner: Option<MapId>,
    at: Option<RecordKey>,
}

impl Position {
    pub(crate) fn new(owner: MapId, at: Option<RecordKey>) -> Self {
        Self {
            owner: Some(owner),
            at,
        }
    }

    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }
}

/// Equal when both point at the same entry of the same map, or both are end
/// positions.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        match (self.at, other.at) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b && self.owner == other.owner,
            _ => false,
        }
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(k) = self.at {
            self.owner.hash(state);
            k.hash(state);
        }
    }
}

impl<K, V, S> ChainHashMap<K, V, S> {
    /// Position of the first entry, or `end()` when empty.
    pub fn begin(&self) -> Position {
        Position::new(self.id, self.order.head)
    }

    pub fn end(&self) -> Position {
        Position::new(self.id, None)
    }

    /// Validate `p` against this map. `Ok(None)` is the end position.
    fn resolve(&self, p: Position) -> Result<Option<RecordKey>, CursorError> {
        match p.owner {
            Some(id) if id == self.id => {}
            Some(_) => return Err(CursorError::WrongMap),
            None if p.at.is_none() => return Ok(None),
            None => return Err(CursorError::WrongMap),
        }
        match p.at {
            Some(k) if !self.records.contains_key(k) => Err(CursorError::Stale),
            at => Ok(at),
        }
    }

    /// Successor of `p`. The last entry steps to `end()`; `end()` stays put.
    pub fn next_position(&self, p: Position) -> Result<Position, CursorError> {
        match self.resolve(p)? {
            Some(k) => Ok(Position::new(self.id, self.records[k].next)),
            None => Ok(p),
        }
    }

    /// Predecessor of `p`. `end()` steps to the last entry. Fails with
    /// `OutOfRange` at the first entry, at the end of an empty map, and for a
    /// position attached to no map.
    pub fn prev_position(&self, p: Position) -> Result<Position, CursorError> {
        if p.owner.is_none() {
            return Err(CursorError::OutOfRange);
        }
        let prev = match self.resolve(p)? {
            Some(k) => self.records[k].prev,
            None => self.order.tail,
        };
        prev.map(|k| Position::new(self.id, Some(k)))
            .ok_or(CursorError::OutOfRange)
    }

    /// Entry at `p`. The end position has no entry and yields `OutOfRange`.
    pub fn entry_at(&self, p: Position) -> Result<(&K, &V), CursorError> {
        let k = self.resolve(p)?.ok_or(CursorError::OutOfRange)?;
        let r = &self.records[k];
        Ok((&r.key, &r.value))
    }

    pub fn entry_at_mut(&mut self, p: Position) -> Result<(&K, &mut V), CursorError> {
        let k = self.resolve(p)?.ok_or(CursorError::OutOfRange)?;
        let r = &mut self.records[k];
        Ok((&r.key, &mut r.value))
    }

    pub fn cursor_front(&self) -> Cursor<'_, K, V, S> {
        Cursor {
            map: self,
            at: self.order.head,
        }
    }

    /// Read-only cursor on the last entry, or at the end when empty.
    pub fn cursor_back(&self) -> Cursor<'_, K, V, S> {
        Cursor {
            map: self,
            at: self.order.tail,
        }
    }

    pub fn cursor_at(&self, p: Position) -> Result<Cursor<'_, K, V, S>, CursorError> {
        let at = self.resolve(p)?;
        Ok(Cursor { map: self, at })
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, S> {
        let at = self.order.head;
        CursorMut { map: self, at }
    }

    pub fn cursor_at_mut(&mut self, p: Position) -> Result<CursorMut<'_, K, V, S>, CursorError> {
        let at = self.resolve(p)?;
        Ok(CursorMut { map: self, at })
    }
}

/// Read-only bidirectional cursor.
pub struct Cursor<'a, K, V, S> {
    map: &'a ChainHashMap<K, V, S>,
    at: Option<RecordKey>,
}

impl<'a, K, V, S> Clone for Cursor<'a, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            at: self.at,
        }
    }
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        let map: &'a ChainHashMap<K, V, S> = self.map;
        let r = &map.records[self.at?];
        Some((&r.key, &r.value))
    }

    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }

    pub fn position(&self) -> Position {
        Position::new(self.map.id, self.at)
    }

    pub fn move_next(&mut self) {
        if let Some(k) = self.at {
            self.at = self.map.records[k].next;
        }
    }

    pub fn move_prev(&mut self) -> Result<(), CursorError> {
        let prev = match self.at {
            Some(k) => self.map.records[k].prev,
            None => self.map.order.tail,
        };
        self.at = Some(prev.ok_or(CursorError::OutOfRange)?);
        Ok(())
    }
}

/// Bidirectional cursor that can update values and remove entries.
pub struct CursorMut<'a, K, V, S> {
    map: &'a mut ChainHashMap<K, V, S>,
    at: Option<RecordKey>,
}

impl<'a, K, V, S> CursorMut<'a, K, V, S> {
    pub fn current(&self) -> Option<(&K, &V)> {
        let r = &self.map.records[self.at?];
        Some((&r.key, &r.value))
    }

    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        let r = &mut self.map.records[self.at?];
        Some((&r.key, &mut r.value))
    }

    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }

    pub fn position(&self) -> Position {
        Position::new(self.map.id, self.at)
    }

    pub fn move_next(&mut self) {
        if let Some(k) = self.at {
            self.at = self.map.records[k].next;
        }
    }

    pub fn move_prev(&mut self) -> Result<(), CursorError> {
        let prev = match self.at {
            Some(k) => self.map.records[k].prev,
            None => self.map.order.tail,
        };
        self.at = Some(prev.ok_or(CursorError::OutOfRange)?);
        Ok(())
    }

    /// Remove the current entry and move to its successor. Returns `None` at
    /// the end position.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let k = self.at?;
        self.at = self.map.records[k].next;
        self.map.unlink(k)
    }
}
