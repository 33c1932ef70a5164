use std::hash::{BuildHasher, Hash};

use super::{dict_base::Dict, node::DictNode};

/// Borrowing iterator over `(&K, &V)`.
///
/// The source distinguished a fast "unsafe" iterator from a mutation-safe
/// one, detecting misuse of the former via a runtime fingerprint check on
/// release. Rust's borrow checker enforces the same rule at compile time: an
/// `Iter` borrows the dictionary immutably for its entire lifetime, so no
/// mutation can happen while one is alive. There is nothing left for a
/// runtime check to catch; use [`Dict::fingerprint`] directly if you want
/// the digest for other purposes (tests, diagnostics).
pub struct Iter<'a, K, V> {
    tables: [&'a super::node::Subtable<K, V>; 2],
    table_idx: usize,
    bucket_idx: usize,
    current: Option<&'a DictNode<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current.take() {
                self.current = node.next.as_deref();
                return Some((&node.key, &node.val));
            }

            if self.bucket_idx >= self.tables[self.table_idx].capacity() {
                if self.table_idx == 0 && !self.tables[1].is_empty_table() {
                    self.table_idx = 1;
                    self.bucket_idx = 0;
                    continue;
                }
                return None;
            }

            self.current = self.tables[self.table_idx].buckets[self.bucket_idx].as_deref();
            self.bucket_idx += 1;
        }
    }
}

/// Borrowing iterator over `(&K, &mut V)`. Same compile-time misuse
/// prevention as [`Iter`]; built eagerly since a streaming mutable
/// chain-walk over two tables borrows `self` in ways the iterator trait
/// can't express without GATs.
pub struct IterMut<'a, K, V> {
    remaining: Vec<(&'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.pop()
    }
}

/// Cursor-based iterator that tolerates arbitrary mutation of the
/// dictionary (including deleting the entry just returned) during
/// traversal, at the cost of yielding owned keys rather than borrows.
///
/// While a `SafeIter` is alive, `iterators_active` on the underlying
/// dictionary is non-zero, which disables both passive and bulk
/// incremental-rehash steps (the table may still grow via the ordinary
/// insert path, but migration will not advance).
///
/// Implementation note: rather than tracking a chain position by count
/// (which desyncs the moment the caller deletes an entry ahead of the
/// cursor, silently skipping whatever shifts into that slot), this tracks
/// the *key* of the next node to visit and re-locates it by search on every
/// step, mirroring the source's "save the next pointer before returning the
/// current entry" discipline.
pub struct SafeIter<'a, K, V, S> {
    dict: &'a mut Dict<K, V, S>,
    table_idx: usize,
    bucket_idx: usize,
    bucket_started: bool,
    pending_key: Option<K>,
    finished: bool,
}

impl<'a, K, V, S> SafeIter<'a, K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub(crate) fn new(dict: &'a mut Dict<K, V, S>) -> Self {
        dict.inc_iterators_active();
        SafeIter {
            dict,
            table_idx: 0,
            bucket_idx: 0,
            bucket_started: false,
            pending_key: None,
            finished: false,
        }
    }

    /// Grants mutable access to the dictionary being traversed, so the
    /// caller can delete, insert, or update entries mid-iteration.
    pub fn dict_mut(&mut self) -> &mut Dict<K, V, S> {
        self.dict
    }

    /// Searches the bucket the cursor is currently on for `key`, returning
    /// the key of whatever follows it in the chain (or `None` if it's the
    /// last link). Returns `None` at the outer level if `key` is no longer
    /// present in that bucket.
    fn next_after(
        &self,
        key: &K,
    ) -> Option<Option<K>> {
        let table = self.dict.table_ref(self.table_idx);
        let mut cur = table.buckets.get(self.bucket_idx)?.as_deref();
        while let Some(node) = cur {
            if &node.key == key {
                return Some(node.next.as_deref().map(|n| n.key.clone()));
            }
            cur = node.next.as_deref();
        }
        None
    }

    fn bucket_head_key(&self) -> Option<K> {
        let table = self.dict.table_ref(self.table_idx);
        if self.bucket_idx >= table.capacity() {
            return None;
        }
        table.buckets[self.bucket_idx]
            .as_deref()
            .map(|node| node.key.clone())
    }

    fn advance_bucket(&mut self) {
        self.bucket_started = false;
        self.bucket_idx += 1;

        let current_capacity = self.dict.table_ref(self.table_idx).capacity();
        if self.bucket_idx >= current_capacity {
            if self.table_idx == 0 && !self.dict.table_ref(1).is_empty_table() {
                self.table_idx = 1;
                self.bucket_idx = 0;
            } else {
                self.finished = true;
            }
        }
    }

    /// Advances the cursor, returning the next live key or `None` once the
    /// traversal is complete.
    pub fn next(&mut self) -> Option<K> {
        loop {
            if self.finished {
                return None;
            }

            if self.dict.table_ref(self.table_idx).capacity() == 0 {
                self.advance_bucket();
                continue;
            }

            if !self.bucket_started {
                self.bucket_started = true;
                self.pending_key = self.bucket_head_key();
            }

            match self.pending_key.take() {
                Some(key) => match self.next_after(&key) {
                    Some(next_key) => {
                        self.pending_key = next_key;
                        return Some(key);
                    }
                    None => {
                        // `key` was deleted since it was queued; move on
                        // rather than guess at the chain's new shape.
                        self.advance_bucket();
                        continue;
                    }
                },
                None => {
                    self.advance_bucket();
                    continue;
                }
            }
        }
    }

    /// Explicit release, mirroring the source's `release_iterator`. Dropping
    /// the iterator does the same thing; this spells it out for callers
    /// that prefer to say so.
    pub fn release(self) {
        drop(self);
    }
}

impl<'a, K, V, S> Drop for SafeIter<'a, K, V, S> {
    fn drop(&mut self) {
        self.dict.dec_iterators_active();
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tables: [self.table_ref(0), self.table_ref(1)],
            table_idx: 0,
            bucket_idx: 0,
            current: None,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let mut remaining: Vec<(&K, &mut V)> = Vec::with_capacity(self.len());
        for table_idx in 0..2 {
            let table = self.table_mut(table_idx);
            for bucket in table.buckets.iter_mut() {
                let mut cur = bucket.as_deref_mut();
                while let Some(node) = cur {
                    let DictNode { key, val, next } = node;
                    remaining.push((&*key, val));
                    cur = next.as_deref_mut();
                }
            }
        }
        IterMut { remaining }
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Starts a mutation-tolerant traversal. See [`SafeIter`].
    pub fn safe_iter(&mut self) -> SafeIter<'_, K, V, S> {
        SafeIter::new(self)
    }

    /// Explicit release, mirroring the source's `release_iterator`.
    pub fn release_iterator(iter: SafeIter<'_, K, V, S>) {
        iter.release();
    }
}

impl<'a, K, V, S> IntoIterator for &'a Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::Dict;

    #[test]
    fn iter_visits_all_entries_once() {
        let mut d = Dict::new();
        for i in 0..200u32 {
            d.insert(i, i * 2);
        }
        let mut seen: Vec<u32> = d.iter().map(|(k, _)| *k).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 200);
    }

    #[test]
    fn iter_mut_allows_updating_values() {
        let mut d = Dict::new();
        for i in 0..10u32 {
            d.insert(i, i);
        }
        for (_, v) in d.iter_mut() {
            *v += 1;
        }
        for i in 0..10u32 {
            assert_eq!(d.get(&i), Some(&(i + 1)));
        }
    }

    #[test]
    fn safe_iter_deleting_every_entry_visits_each_once() {
        let mut d = Dict::new();
        for i in 0..100u32 {
            d.insert(i, i);
        }

        let mut visited = Vec::new();
        let mut iter = d.safe_iter();
        while let Some(key) = iter.next() {
            visited.push(key);
        }
        drop(iter);

        for key in &visited {
            d.remove(key);
        }

        visited.sort_unstable();
        visited.dedup();
        assert_eq!(visited.len(), 100);
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn safe_iter_delete_during_traversal_never_revisits() {
        let mut d = Dict::new();
        for i in 0..100u32 {
            d.insert(i, i);
        }

        let mut count = 0;
        let mut seen = std::collections::HashSet::new();
        let mut iter = d.safe_iter();
        loop {
            let key = match iter.next() {
                Some(k) => k,
                None => break,
            };
            assert!(seen.insert(key), "key {key} visited twice");
            count += 1;
            iter.dict_mut().remove(&key);
        }
        drop(iter);
        assert_eq!(count, 100);
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn safe_iter_on_empty_dict_returns_none() {
        let mut d: Dict<u32, u32> = Dict::new();
        let mut iter = d.safe_iter();
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn safe_iter_disables_passive_rehash() {
        let mut d = Dict::new();
        for i in 0..50u32 {
            d.insert(i, i);
        }
        let was_rehashing = d.is_rehashing();
        let rehash_idx_before = d.rehash_index();
        {
            let mut iter = d.safe_iter();
            while iter.next().is_some() {}
        }
        if was_rehashing {
            assert_eq!(d.rehash_index(), rehash_idx_before);
        }
    }
}
