//! Global order list: insertion order of every live record, threaded through
//! the records' `prev`/`next` links and independent of bucket placement.

use crate::record::{RecordKey, Records};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct OrderList {
    pub(crate) head: Option<RecordKey>,
    pub(crate) tail: Option<RecordKey>,
}

impl OrderList {
    pub(crate) fn push_back<K, V>(&mut self, records: &mut Records<K, V>, k: RecordKey) {
        records[k].prev = self.tail;
        records[k].next = None;
        match self.tail {
            Some(t) => records[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    /// Splice `k` out, relinking its neighbours and the ends as needed.
    pub(crate) fn unlink<K, V>(&mut self, records: &mut Records<K, V>, k: RecordKey) {
        let prev = records[k].prev.take();
        let next = records[k].next.take();
        match prev {
            Some(p) => records[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => records[n].prev = prev,
            None => self.tail = prev,
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record keys from head to tail.
    pub(crate) fn keys<'a, K, V>(&self, records: &'a Records<K, V>) -> impl Iterator<Item = RecordKey> + 'a {
        let mut cur = self.head;
        std::iter::from_fn(move || {
            let k = cur?;
            cur = records[k].next;
            Some(k)
        })
    }
}
