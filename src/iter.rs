//! Std-style iterators, all in insertion order and double-ended.

use crate::chain_hash_map::ChainHashMap;
use crate::order::OrderList;
use crate::record::{RecordKey, Records};
use core::iter::FusedIterator;
use slotmap::SecondaryMap;

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    records: &'a Records<K, V>,
    front: Option<RecordKey>,
    back: Option<RecordKey>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            records: self.records,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let r = &self.records[self.front?];
        self.front = r.next;
        self.remaining -= 1;
        Some((&r.key, &r.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let r = &self.records[self.back?];
        self.back = r.prev;
        self.remaining -= 1;
        Some((&r.key, &r.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    inner: std::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator.
pub struct IntoIter<K, V> {
    records: Records<K, V>,
    front: Option<RecordKey>,
    back: Option<RecordKey>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.records.remove(self.front?)?;
        self.front = r.next;
        if self.records.is_empty() {
            self.front = None;
            self.back = None;
        }
        Some((r.key, r.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.records.len(), Some(self.records.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let r = self.records.remove(self.back?)?;
        self.back = r.prev;
        if self.records.is_empty() {
            self.front = None;
            self.back = None;
        }
        Some((r.key, r.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Entries removed by `drain`, in insertion order.
pub struct Drain<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Drain<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Drain<K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V, S> ChainHashMap<K, V, S> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            records: &self.records,
            front: self.order.head,
            back: self.order.tail,
            remaining: self.len(),
        }
    }

    /// Mutable iteration in insertion order.
    ///
    /// Not lazy: the store hands out disjoint `&mut` only in slot order, so
    /// each call ranks every entry by its order-list position and collects
    /// the references up front, which is O(n) time and allocation before the
    /// first item. `cursor_front_mut` steps in O(1) without allocating.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.len();
        let mut rank: SecondaryMap<RecordKey, usize> = SecondaryMap::with_capacity(len);
        for (i, k) in self.order.keys(&self.records).enumerate() {
            rank.insert(k, i);
        }
        let mut placed: Vec<Option<(&K, &mut V)>> = Vec::with_capacity(len);
        placed.resize_with(len, || None);
        for (k, r) in self.records.iter_mut() {
            if let Some(&i) = rank.get(k) {
                placed[i] = Some((&r.key, &mut r.value));
            }
        }
        IterMut {
            inner: placed.into_iter().flatten().collect::<Vec<_>>().into_iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Built on [`iter_mut`](Self::iter_mut) and shares its up-front cost.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Move every entry out in insertion order. The map is left empty with
    /// its bucket count unchanged, even if the iterator is dropped early.
    /// Entries are removed from the store up front, so positions into them
    /// go stale rather than aliasing later inserts.
    pub fn drain(&mut self) -> Drain<K, V> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = self.order.head;
        while let Some(k) = cur {
            let Some(r) = self.records.remove(k) else {
                break;
            };
            cur = r.next;
            out.push((r.key, r.value));
        }
        debug_assert!(self.records.is_empty());
        self.order.clear();
        self.buckets.clear();
        Drain {
            inner: out.into_iter(),
        }
    }
}

impl<K, V, S> IntoIterator for ChainHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        let OrderList { head, tail } = self.order;
        IntoIter {
            records: self.records,
            front: head,
            back: tail,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
