use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

use rdict_error::{bail, ensure, DictError, RdictResult};

use super::{
    entry::Entry,
    hash::{avalanche, resize_enabled, DictHashState},
    node::{DictNode, Subtable},
};

/// Initial primary capacity on first insertion.
const INITIAL_CAPACITY: usize = 4;

/// When `resize_enabled` is false, growth is deferred until the load factor
/// exceeds this ratio.
const FORCE_RESIZE_RATIO: usize = 5;

/// Empty-bucket skip budget per migrated bucket during an incremental rehash
/// step, expressed as a multiple of the requested bucket count.
const REHASH_EMPTY_SKIP_FACTOR: usize = 10;

/// Bucket batch size used by the time-bounded bulk rehash.
const BULK_REHASH_BATCH: usize = 100;

/// Outcome of [`Dict::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replaced<V> {
    Inserted,
    Overwritten(V),
}

/// Outcome of [`Dict::rehash`]: whether more buckets remain to migrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehashStatus {
    MoreWork,
    Done,
}

/// An entry spliced out of the dictionary without running destructors
/// (here: without dropping key/value). In safe Rust this carries no extra
/// capability over `remove` beyond naming the "splice but don't free yet"
/// step from the source design; it exists for API parity with
/// [`Dict::unlink`] / [`Dict::free_unlinked`].
#[derive(Debug)]
pub struct UnlinkedEntry<K, V> {
    pub key: K,
    pub val: V,
}

/// An incrementally-rehashing chained hash dictionary.
///
/// Holds two backing [`Subtable`]s (primary and secondary). At rest all
/// entries live in the primary and the secondary has zero capacity. A
/// resize begins a *rehash*: the secondary is allocated at the new
/// capacity and entries migrate from primary to secondary one bucket at a
/// time, amortized across subsequent operations, until the primary is
/// empty and is replaced by the (now promoted) secondary.
///
/// **Invariants** (see the crate's design notes for the full list):
/// - `rehash_idx == -1` ⇔ the secondary is uninitialized and empty.
/// - While rehashing, primary buckets `[0, rehash_idx)` are empty.
/// - A key exists in at most one entry across both subtables.
pub struct Dict<K, V, S = DictHashState> {
    table: [Subtable<K, V>; 2],
    rehash_idx: isize,
    iterators_active: usize,
    hash_builder: S,
}

////////////////////////////////////////////////////////////////////////////////
// Construction
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Dict<K, V, DictHashState>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_hasher(DictHashState)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DictHashState)
    }
}

impl<K, V> Default for Dict<K, V, DictHashState>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Dict {
            table: [Subtable::empty(), Subtable::empty()],
            rehash_idx: -1,
            iterators_active: 0,
            hash_builder,
        }
    }

    pub fn with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Self {
        let mut dict = Self::with_hasher(hash_builder);
        if capacity > 0 {
            dict.table[0] = Subtable::with_capacity(capacity.next_power_of_two().max(INITIAL_CAPACITY));
        }
        dict
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

////////////////////////////////////////////////////////////////////////////////
// Size, shape queries
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.table[0].used + self.table[1].used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Combined capacity of both backing tables.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table[0].capacity() + self.table[1].capacity()
    }

    #[inline]
    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx != -1
    }

    /// The next primary bucket awaiting migration, or `-1` when idle.
    #[inline]
    pub fn rehash_index(&self) -> isize {
        self.rehash_idx
    }

    #[inline]
    pub fn iterators_active(&self) -> usize {
        self.iterators_active
    }

    pub(crate) fn table_ref(
        &self,
        idx: usize,
    ) -> &Subtable<K, V> {
        &self.table[idx]
    }

    pub(crate) fn table_mut(
        &mut self,
        idx: usize,
    ) -> &mut Subtable<K, V> {
        &mut self.table[idx]
    }

    pub(crate) fn inc_iterators_active(&mut self) {
        self.iterators_active += 1;
    }

    pub(crate) fn dec_iterators_active(&mut self) {
        self.iterators_active -= 1;
    }

    /// A 64-bit digest of the dictionary's shape (backing addresses,
    /// capacities, used counts). Changes iff any of those six values
    /// changes; grep the crate-level docs for why a Rust `Iter` borrow
    /// makes the source's runtime fingerprint assertion unnecessary for
    /// safe-by-construction misuse detection — this method is kept for the
    /// cases (hashing, logging, tests) that want the digest directly.
    pub fn fingerprint(&self) -> u64 {
        let fields = [
            self.table[0].buckets.as_ptr() as u64,
            self.table[0].capacity() as u64,
            self.table[0].used as u64,
            self.table[1].buckets.as_ptr() as u64,
            self.table[1].capacity() as u64,
            self.table[1].used as u64,
        ];
        fields.iter().fold(0u64, |acc, &v| acc ^ avalanche(v))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Hashing
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash_of<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(key)
    }

    /// Exposed for callers that want to precompute a hash once and reuse it
    /// (see [`Dict::get_with_hash`]).
    #[inline]
    pub fn get_hash(
        &self,
        key: &K,
    ) -> u64 {
        self.hash_of(key)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Lookup
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn get<Q>(
        &self,
        key: &Q,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_of(key);
        self.get_with_hash(hash, key)
    }

    /// Looks up a key given a precomputed hash, skipping the rehash of the
    /// key itself. This is the safe-Rust translation of the source's
    /// `find_ref_by_identity_and_hash`: that operation located a chain link
    /// by pointer identity so a caller holding a dangling-but-formerly-live
    /// key pointer could splice it out without recomputing a hash. Owned
    /// generic keys in Rust have no such identity to exploit, so the useful
    /// part that survives is "skip re-hashing when the caller already has
    /// it" — this method.
    pub fn get_with_hash<Q>(
        &self,
        hash: u64,
        key: &Q,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        for table_idx in 0..2 {
            let table = &self.table[table_idx];
            if table.is_empty_table() {
                if table_idx == 0 {
                    continue;
                }
                break;
            }

            let bucket = (hash as usize) & table.mask;
            let mut cur = table.buckets[bucket].as_deref();
            while let Some(node) = cur {
                if node.key.borrow() == key {
                    return Some(&node.val);
                }
                cur = node.next.as_deref();
            }

            if !self.is_rehashing() {
                break;
            }
        }
        None
    }

    pub fn get_mut<Q>(
        &mut self,
        key: &Q,
    ) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.passive_rehash_step();
        let hash = self.hash_of(key);

        for table_idx in 0..2 {
            if self.table[table_idx].is_empty_table() {
                if table_idx == 0 {
                    continue;
                }
                break;
            }

            let bucket = (hash as usize) & self.table[table_idx].mask;
            let mut cur = &mut self.table[table_idx].buckets[bucket];
            while let Some(node) = cur {
                if node.key.borrow() == key {
                    return Some(&mut node.val);
                }
                cur = &mut node.next;
            }

            if !self.is_rehashing() {
                break;
            }
        }
        None
    }

    pub fn contains_key<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Alias for [`Dict::get`] under the source's vocabulary.
    #[inline]
    pub fn fetch_value<Q>(
        &self,
        key: &Q,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key)
    }

    /// Alias for [`Dict::contains_key`] under the source's vocabulary.
    #[inline]
    pub fn find<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.contains_key(key)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Mutation
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns a view into the slot for `key`: occupied if present, vacant
    /// otherwise. See [`Entry`].
    pub fn entry(
        &mut self,
        key: K,
    ) -> Entry<'_, K, V, S> {
        self.passive_rehash_step();
        self.maybe_expand();

        let hash = self.hash_of(&key);

        for table_idx in 0..2 {
            if self.table[table_idx].is_empty_table() {
                if table_idx == 0 {
                    continue;
                }
                break;
            }

            let mask = self.table[table_idx].mask;
            let bucket = (hash as usize) & mask;

            let Subtable { buckets, used, .. } = &mut self.table[table_idx];
            if let Some(slot) = Self::find_slot_mut(&mut buckets[bucket], &key) {
                return Entry::Occupied(super::entry::OccupiedEntry { slot, used });
            }

            if !self.is_rehashing() {
                break;
            }
        }

        let insertion_table = if self.is_rehashing() { 1 } else { 0 };
        let mask = self.table[insertion_table].mask;
        let bucket = (hash as usize) & mask;
        let Subtable { buckets, used, .. } = &mut self.table[insertion_table];

        Entry::Vacant(super::entry::VacantEntry {
            key,
            slot: &mut buckets[bucket],
            used,
            _marker: std::marker::PhantomData,
        })
    }

    /// Walks a bucket chain looking for `key`, returning a mutable reference
    /// to whichever `Option` cell holds the matching node — the bucket head
    /// itself, or some predecessor's `next` link. Needed because `entry()`
    /// must operate on the matching node, not just the head of its chain.
    fn find_slot_mut<'a>(
        head: &'a mut Option<Box<DictNode<K, V>>>,
        key: &K,
    ) -> Option<&'a mut Option<Box<DictNode<K, V>>>> {
        let mut cur = head;
        loop {
            match cur {
                None => return None,
                Some(node) if &node.key == key => return Some(cur),
                Some(node) => cur = &mut node.next,
            }
        }
    }

    /// Inserts `key`/`val` only if `key` is not already present. Returns
    /// `true` if inserted, `false` (leaving the dictionary unchanged) if the
    /// key already existed — this never overwrites; use [`Dict::replace`]
    /// for that.
    pub fn add(
        &mut self,
        key: K,
        val: V,
    ) -> bool {
        match self.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(val);
                true
            }
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `default()` first if absent. The source's `add_or_find` left the
    /// value slot of a freshly created entry uninitialized for the caller
    /// to fill in; safe Rust cannot represent an uninitialized field, so
    /// this takes the producer up front, same as `Entry::or_insert_with`.
    pub fn add_or_find_with(
        &mut self,
        key: K,
        default: impl FnOnce() -> V,
    ) -> &mut V {
        self.entry(key).or_insert_with(default)
    }

    /// Sets `key` to `val` regardless of whether it already existed.
    /// Reports whether an existing value was overwritten.
    ///
    /// For an existing key the new value is written before the old one is
    /// dropped (`mem::replace`'s own order) — load-bearing when values are
    /// reference-counted and the new and old values happen to alias.
    pub fn replace(
        &mut self,
        key: K,
        val: V,
    ) -> Replaced<V> {
        match self.entry(key) {
            Entry::Occupied(mut e) => Replaced::Overwritten(e.insert(val)),
            Entry::Vacant(e) => {
                e.insert(val);
                Replaced::Inserted
            }
        }
    }

    /// `HashMap`-style insert: returns the previous value, if any.
    pub fn insert(
        &mut self,
        key: K,
        val: V,
    ) -> Option<V> {
        match self.replace(key, val) {
            Replaced::Inserted => None,
            Replaced::Overwritten(old) => Some(old),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Deletion
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Removes `key`, running its destructors (here: dropping key and
    /// value). Returns the removed value.
    pub fn remove<Q>(
        &mut self,
        key: &Q,
    ) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.unlink(key).map(|e| e.val)
    }

    /// Splices `key` out of its chain without dropping it, returning the
    /// key and value for the caller to inspect or transfer. Companion to
    /// [`Dict::free_unlinked`].
    pub fn unlink<Q>(
        &mut self,
        key: &Q,
    ) -> Option<UnlinkedEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.passive_rehash_step();
        let hash = self.hash_of(key);

        for table_idx in 0..2 {
            if self.table[table_idx].is_empty_table() {
                if table_idx == 0 {
                    continue;
                }
                break;
            }

            let bucket = (hash as usize) & self.table[table_idx].mask;
            if let Some(node) = Self::splice_from_chain(&mut self.table[table_idx].buckets[bucket], key) {
                self.table[table_idx].used -= 1;
                return Some(UnlinkedEntry {
                    key: node.key,
                    val: node.val,
                });
            }

            if !self.is_rehashing() {
                break;
            }
        }
        None
    }

    /// Drops an entry previously removed via [`Dict::unlink`]. In safe Rust
    /// this is just `drop`; it exists so code translated from the source's
    /// "unlink now, free later" two-step reads the same way here.
    pub fn free_unlinked(_entry: UnlinkedEntry<K, V>) {}

    fn splice_from_chain<Q>(
        head: &mut Option<Box<DictNode<K, V>>>,
        key: &Q,
    ) -> Option<Box<DictNode<K, V>>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cur = head;
        loop {
            match cur {
                None => return None,
                Some(node) if node.key.borrow() == key => {
                    let mut node = cur.take().unwrap();
                    *cur = node.next.take();
                    return Some(node);
                }
                Some(node) => cur = &mut node.next,
            }
        }
    }

    pub fn clear(&mut self) {
        self.table[0].clear();
        self.table[1].clear();
        self.rehash_idx = -1;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Growth, shrink, incremental rehashing
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Growth decision run before every insertion: see §4.4 of the crate's
    /// design notes for the exact ladder (uninitialized → initial capacity;
    /// load factor ≥ 1, or `force_resize_ratio` when resize is disabled, →
    /// double).
    fn maybe_expand(&mut self) {
        if self.is_rehashing() {
            return;
        }

        let capacity = self.table[0].capacity();
        let used = self.table[0].used;

        if capacity == 0 {
            self.table[0] = Subtable::with_capacity(INITIAL_CAPACITY);
            return;
        }

        let should_grow = used >= capacity
            && (resize_enabled() || used / capacity > FORCE_RESIZE_RATIO);

        if should_grow {
            let target = (used * 2).next_power_of_two();
            let _ = self.begin_expand(target);
        }
    }

    /// Explicitly expands to (at least) `capacity`, beginning a rehash.
    /// Fails if a rehash is already in progress or `capacity` would not
    /// grow the table.
    pub fn expand(
        &mut self,
        capacity: usize,
    ) -> RdictResult<()> {
        ensure!(
            !self.is_rehashing(),
            DictError::Busy { operation: "expand" }
        );
        self.begin_expand(capacity.next_power_of_two().max(INITIAL_CAPACITY))
    }

    fn begin_expand(
        &mut self,
        capacity: usize,
    ) -> RdictResult<()> {
        if self.table[0].is_empty_table() {
            self.table[0] = Subtable::with_capacity(capacity);
            return Ok(());
        }

        ensure!(
            capacity != self.table[0].capacity(),
            DictError::InvariantViolation {
                reason: "expand target equals current primary capacity".to_string(),
            }
        );
        ensure!(
            capacity >= self.table[0].used,
            DictError::InvariantViolation {
                reason: "expand target smaller than the number of live entries".to_string(),
            }
        );

        self.table[1] = Subtable::with_capacity(capacity);
        self.rehash_idx = 0;
        Ok(())
    }

    /// Shrinks (or grows) to fit the current load, targeting a load factor
    /// near 1. No-op if a rehash is already running or resize is disabled.
    pub fn resize_to_fit(&mut self) -> RdictResult<()> {
        if self.is_rehashing() {
            return Ok(());
        }
        if !resize_enabled() {
            return Ok(());
        }
        let target = self.table[0].used.next_power_of_two().max(INITIAL_CAPACITY);
        if target == self.table[0].capacity() {
            return Ok(());
        }
        self.begin_expand(target)
    }

    /// Migrates up to `n_steps` non-empty buckets from primary to
    /// secondary. Refuses while any iterator is active.
    pub fn rehash(
        &mut self,
        n_steps: usize,
    ) -> RehashStatus {
        if self.iterators_active > 0 {
            return RehashStatus::MoreWork;
        }
        self.rehash_steps(n_steps).0
    }

    /// Migrates up to `n_steps` non-empty buckets, returning the status
    /// alongside the number of buckets actually migrated (not counting
    /// empty-bucket skips spent from the `REHASH_EMPTY_SKIP_FACTOR` budget).
    fn rehash_steps(
        &mut self,
        n_steps: usize,
    ) -> (RehashStatus, usize) {
        if !self.is_rehashing() {
            return (RehashStatus::Done, 0);
        }

        let empty_budget_total = n_steps * REHASH_EMPTY_SKIP_FACTOR;
        let mut empty_budget = empty_budget_total;
        let mut migrated = 0usize;

        while migrated < n_steps {
            if self.table[0].used == 0 {
                self.finish_rehash();
                return (RehashStatus::Done, migrated);
            }

            let idx = self.rehash_idx as usize;
            if idx >= self.table[0].capacity() {
                self.finish_rehash();
                return (RehashStatus::Done, migrated);
            }

            if self.table[0].buckets[idx].is_none() {
                self.rehash_idx += 1;
                empty_budget -= 1;
                if empty_budget == 0 {
                    return (RehashStatus::MoreWork, migrated);
                }
                continue;
            }

            self.migrate_bucket(idx);
            self.rehash_idx += 1;
            migrated += 1;
        }

        if self.table[0].used == 0 {
            self.finish_rehash();
            return (RehashStatus::Done, migrated);
        }
        (RehashStatus::MoreWork, migrated)
    }

    fn migrate_bucket(
        &mut self,
        idx: usize,
    ) {
        let mut chain = self.table[0].buckets[idx].take();
        while let Some(mut node) = chain {
            chain = node.next.take();

            let hash = self.hash_of(&node.key);
            let bucket = (hash as usize) & self.table[1].mask;

            node.next = self.table[1].buckets[bucket].take();
            self.table[1].buckets[bucket] = Some(node);

            self.table[0].used -= 1;
            self.table[1].used += 1;
        }
    }

    fn finish_rehash(&mut self) {
        self.table[0] = std::mem::replace(&mut self.table[1], Subtable::empty());
        self.rehash_idx = -1;
    }

    /// Time-bounded bulk rehash: issues 100-bucket steps until no work
    /// remains or `ms` milliseconds have elapsed (checked between steps).
    /// Refuses while any iterator is active. Returns the number of buckets
    /// migrated.
    pub fn rehash_milliseconds(
        &mut self,
        ms: u64,
    ) -> usize {
        if self.iterators_active > 0 || !self.is_rehashing() {
            return 0;
        }

        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(ms);
        let mut total = 0usize;

        loop {
            let (status, migrated) = self.rehash_steps(BULK_REHASH_BATCH);
            total += migrated;
            if status == RehashStatus::Done {
                break;
            }

            if std::time::Instant::now() >= deadline {
                break;
            }
        }
        total
    }

    /// A single migrated-bucket step, run at the start of every mutation
    /// and lookup while a rehash is in progress and no iterator is active.
    pub(crate) fn passive_rehash_step(&mut self) {
        if self.iterators_active == 0 && self.is_rehashing() {
            self.rehash_steps(1);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Common trait impls
////////////////////////////////////////////////////////////////////////////////

impl<K, V, S> Clone for Dict<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut out = Dict::with_capacity_and_hasher(self.len(), self.hash_builder.clone());
        for (k, v) in self.iter() {
            out.insert(k.clone(), v.clone());
        }
        out
    }
}

impl<K, V, S> Default for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dict as PubDict;

    #[test]
    fn empty_dict_find_and_size() {
        let d: PubDict<&str, i32> = PubDict::new();
        assert_eq!(d.get(&"x"), None);
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn add_does_not_overwrite() {
        let mut d = PubDict::new();
        assert!(d.add("a", 1));
        assert!(d.add("b", 2));
        assert!(!d.add("a", 3));
        assert_eq!(d.fetch_value(&"a"), Some(&1));
    }

    #[test]
    fn replace_overwrites_and_is_idempotent() {
        let mut d = PubDict::new();
        d.add("a", 1);
        assert_eq!(d.replace("a", 99), Replaced::Overwritten(1));
        assert_eq!(d.fetch_value(&"a"), Some(&99));
        assert_eq!(d.replace("a", 99), Replaced::Overwritten(99));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn growth_triggers_rehash_after_fifth_insert() {
        let mut d = PubDict::new();
        for i in 0..4u32 {
            d.insert(i, i);
        }
        assert_eq!(d.capacity(), 4);
        d.insert(4, 4);
        assert!(d.is_rehashing() || d.capacity() >= 8);
    }

    #[test]
    fn remove_then_find_is_not_found() {
        let mut d = PubDict::new();
        d.insert("x", 100);
        assert_eq!(d.remove(&"x"), Some(100));
        assert_eq!(d.get(&"x"), None);
        assert_eq!(d.remove(&"x"), None);
    }

    #[test]
    fn unlink_and_free_unlinked_round_trip() {
        let mut d = PubDict::new();
        d.insert(1u32, "one".to_string());
        let entry = d.unlink(&1u32).unwrap();
        assert_eq!(entry.key, 1);
        assert_eq!(entry.val, "one");
        assert_eq!(d.len(), 0);
        PubDict::<u32, String>::free_unlinked(entry);
    }

    #[test]
    fn large_scale_insert_and_lookup() {
        let mut d = PubDict::new();
        for i in 0..5_000u64 {
            d.insert(i, i * 2);
        }
        assert_eq!(d.len(), 5_000);
        for i in 0..5_000u64 {
            assert_eq!(d.get(&i), Some(&(i * 2)));
        }
    }

    #[test]
    fn clear_resets_rehash_state() {
        let mut d = PubDict::new();
        for i in 0..50u32 {
            d.insert(i, i);
        }
        d.clear();
        assert_eq!(d.len(), 0);
        assert!(!d.is_rehashing());
        assert_eq!(d.rehash_index(), -1);
    }

    #[test]
    fn expand_rejects_same_capacity() {
        let mut d: PubDict<u32, u32> = PubDict::with_capacity(4);
        assert!(d.expand(4).is_err());
    }

    #[test]
    fn expand_rejects_while_rehashing() {
        let mut d = PubDict::new();
        for i in 0..10u32 {
            d.insert(i, i);
        }
        if d.is_rehashing() {
            assert!(d.expand(64).is_err());
        }
    }

    #[test]
    fn rehash_milliseconds_refuses_with_active_iterator() {
        let mut d = PubDict::new();
        for i in 0..10u32 {
            d.insert(i, i);
        }
        d.iterators_active += 1;
        let steps = d.rehash_milliseconds(50);
        d.iterators_active -= 1;
        assert_eq!(steps, 0);
    }

    #[test]
    fn rehash_milliseconds_counts_every_migrated_bucket_including_the_final_batch() {
        let mut d = PubDict::new();
        for i in 0..200u32 {
            d.insert(i, i);
        }
        assert!(d.is_rehashing());
        let primary_non_empty_buckets = d.table_stats_all()[0].non_empty_buckets;

        let migrated = d.rehash_milliseconds(1_000);

        assert!(!d.is_rehashing());
        assert_eq!(migrated, primary_non_empty_buckets);
        assert_eq!(d.len(), 200);
    }

    #[test]
    fn fingerprint_changes_on_growth() {
        let mut d = PubDict::new();
        d.insert("a", 1);
        let fp1 = d.fingerprint();
        for i in 0..20u32 {
            d.insert(i, i);
        }
        let fp2 = d.fingerprint();
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn clone_preserves_contents() {
        let mut d = PubDict::new();
        for i in 0..30u32 {
            d.insert(i, i * 3);
        }
        let cloned = d.clone();
        assert_eq!(cloned.len(), d.len());
        for i in 0..30u32 {
            assert_eq!(cloned.get(&i), Some(&(i * 3)));
        }
    }

    #[test]
    fn add_or_find_with_returns_existing_without_calling_default() {
        let mut d = PubDict::new();
        d.insert("k", 10);
        let mut calls = 0;
        let v = d.add_or_find_with("k", || {
            calls += 1;
            999
        });
        assert_eq!(*v, 10);
        assert_eq!(calls, 0);
    }

    #[test]
    fn entry_mutates_matching_node_even_mid_chain() {
        let mut d = PubDict::new();
        for i in 0..200u32 {
            d.insert(i, i);
        }
        let stats = d.table_stats_all();
        assert!(
            stats.iter().any(|s| s.max_chain_length > 1),
            "test needs a real bucket collision to be meaningful"
        );

        for i in 0..200u32 {
            *d.entry(i).or_insert(0) += 1_000;
        }
        for i in 0..200u32 {
            assert_eq!(d.get(&i), Some(&(i + 1_000)));
        }
        assert_eq!(d.len(), 200);
    }
}
