use std::hash::{BuildHasher, Hash};

use super::dict_base::Dict;

/// Reverse-binary increment: sets every bit above `mask` to one, bit-reverses
/// the 64-bit word, adds one, and bit-reverses again. Incrementing from the
/// high end makes the cursor visit buckets in an order that survives the
/// table doubling or halving between calls — see [`Dict::scan`]'s docs.
fn rev_increment(
    cursor: u64,
    mask: usize,
) -> u64 {
    let mask = mask as u64;
    let v = cursor | !mask;
    let v = v.reverse_bits();
    let v = v.wrapping_add(1);
    v.reverse_bits()
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Stateless cursor scan: visits every entry present throughout the
    /// scan under a table of stable size, and still visits everything live
    /// even if the table grows or shrinks between calls or a rehash is in
    /// progress — at the cost of possibly visiting some entries more than
    /// once. Start with `cursor = 0`; a returned cursor of `0` means the
    /// scan has completed a full cycle.
    ///
    /// `visit` is called once per live entry in the bucket(s) emitted by
    /// this call.
    pub fn scan<F>(
        &mut self,
        cursor: u64,
        mut visit: F,
    ) -> u64
    where
        F: FnMut(&K, &V),
    {
        if self.table_ref(0).capacity() == 0 {
            return 0;
        }

        self.inc_iterators_active();
        let next_cursor = if !self.is_rehashing() {
            let mask = self.table_ref(0).mask;
            let bucket = (cursor as usize) & mask;
            Self::emit_bucket(self.table_ref(0), bucket, &mut visit);
            rev_increment(cursor, mask)
        } else {
            let (small_idx, large_idx) = if self.table_ref(0).capacity() <= self.table_ref(1).capacity() {
                (0, 1)
            } else {
                (1, 0)
            };
            let mask_small = self.table_ref(small_idx).mask;
            let mask_large = self.table_ref(large_idx).mask;

            let bucket_small = (cursor as usize) & mask_small;
            Self::emit_bucket(self.table_ref(small_idx), bucket_small, &mut visit);

            let mut c = cursor;
            loop {
                let bucket_large = (c as usize) & mask_large;
                Self::emit_bucket(self.table_ref(large_idx), bucket_large, &mut visit);
                c = rev_increment(c, mask_large);
                if c & ((mask_small ^ mask_large) as u64) == 0 {
                    break;
                }
            }

            rev_increment(cursor, mask_small)
        };
        self.dec_iterators_active();

        next_cursor
    }

    fn emit_bucket(
        table: &super::node::Subtable<K, V>,
        bucket: usize,
        visit: &mut impl FnMut(&K, &V),
    ) {
        let mut cur = table.buckets[bucket].as_deref();
        while let Some(node) = cur {
            visit(&node.key, &node.val);
            cur = node.next.as_deref();
        }
    }
}
