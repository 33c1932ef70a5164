/// One element in a bucket's collision chain.
///
/// Entries are individually heap-allocated and exclusively owned by the
/// bucket chain they live in; migrating an entry during rehashing moves this
/// box, it never reallocates the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DictNode<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) next: Option<Box<DictNode<K, V>>>,
}

impl<K, V> DictNode<K, V> {
    pub(crate) fn new(
        key: K,
        val: V,
        next: Option<Box<DictNode<K, V>>>,
    ) -> Box<Self> {
        Box::new(DictNode { key, val, next })
    }
}

/// One of the dictionary's two backing arrays: a fixed-capacity array of
/// bucket heads, plus the bitmask and live-entry count.
///
/// `capacity` is always zero (uninitialized) or a power of two. `mask` is
/// `capacity - 1` and coincides with modulo-capacity indexing.
#[derive(Debug, Clone)]
pub(crate) struct Subtable<K, V> {
    pub(crate) buckets: Vec<Option<Box<DictNode<K, V>>>>,
    pub(crate) mask: usize,
    pub(crate) used: usize,
}

impl<K, V> Subtable<K, V> {
    pub(crate) fn empty() -> Self {
        Subtable {
            buckets: Vec::new(),
            mask: 0,
            used: 0,
        }
    }

    /// Allocates a table of `capacity` zero-initialized buckets. `capacity`
    /// must already be a power of two; zero is accepted and yields an
    /// uninitialized table.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Subtable::empty();
        }

        debug_assert!(capacity.is_power_of_two());

        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || None);

        Subtable {
            buckets,
            mask: capacity - 1,
            used: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn is_empty_table(&self) -> bool {
        self.buckets.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.mask = 0;
        self.used = 0;
    }
}
