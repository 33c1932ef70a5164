use std::hash::{BuildHasher, Hash};

use rand::Rng;

use super::dict_base::Dict;

const MIN_EMPTY_RUN_FOR_RESEED: usize = 5;
const FAIR_SAMPLE_SIZE: usize = 15;

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Picks a non-empty bucket uniformly over the populated index range
    /// and returns a uniformly random entry from its chain. While
    /// rehashing, the populated range is `[rehash_idx, primary.capacity +
    /// secondary.capacity)`, mapped piecewise across the two tables — this
    /// biases toward whichever table is larger, a known property of the
    /// source this is grounded on (see the crate's design notes).
    pub fn random_entry(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }

        let mut rng = rand::thread_rng();
        let primary_cap = self.table_ref(0).capacity();

        for _ in 0..primary_cap.max(64) * 4 {
            let (table_idx, bucket_idx) = if !self.is_rehashing() {
                (0, rng.gen_range(0..primary_cap))
            } else {
                let start = self.rehash_index() as usize;
                let total = primary_cap + self.table_ref(1).capacity();
                let idx = rng.gen_range(start..total);
                if idx < primary_cap {
                    (0, idx)
                } else {
                    (1, idx - primary_cap)
                }
            };

            if let Some(head) = self.table_ref(table_idx).buckets[bucket_idx].as_deref() {
                let mut len = 1usize;
                let mut cur = head.next.as_deref();
                while let Some(node) = cur {
                    len += 1;
                    cur = node.next.as_deref();
                }

                let pick = rng.gen_range(0..len);
                let mut cur = Some(head);
                for _ in 0..pick {
                    cur = cur.unwrap().next.as_deref();
                }
                return cur.map(|n| (&n.key, &n.val));
            }
        }

        // Pathological: every randomly picked bucket in range was empty.
        // Fall back to a deterministic scan so the call still succeeds.
        for table_idx in 0..2 {
            for bucket in &self.table_ref(table_idx).buckets {
                if let Some(node) = bucket.as_deref() {
                    return Some((&node.key, &node.val));
                }
            }
        }
        None
    }

    /// Tries to collect `count` entries by scanning forward from a random
    /// index, skipping invisible regions (primary buckets already migrated
    /// past `rehash_idx`, and indices that don't exist in the smaller
    /// table). Gives up after `count * 10` bucket visits. Duplicates are
    /// possible; not uniform when chain lengths vary. Spends up to `count`
    /// passive rehash steps first so progress is made even if the caller
    /// samples in a tight loop without otherwise touching the dictionary.
    pub fn sample_k(
        &mut self,
        count: usize,
    ) -> Vec<(&K, &V)> {
        if count == 0 || self.is_empty() {
            return Vec::new();
        }

        for _ in 0..count {
            if !self.is_rehashing() {
                break;
            }
            self.passive_rehash_step();
        }

        let max_mask = self.table_ref(0).mask.max(self.table_ref(1).mask) as u64;
        let mut rng = rand::thread_rng();
        let mut idx = rng.gen_range(0..=max_mask);
        let mut collected: Vec<(&K, &V)> = Vec::new();
        let mut attempts = 0usize;
        let max_attempts = count * 10;
        let mut empty_run = 0usize;

        while collected.len() < count && attempts < max_attempts {
            attempts += 1;

            match self.visible_bucket(idx) {
                Some((t, b)) => {
                    let mut cur = self.table_ref(t).buckets[b].as_deref();
                    let mut any = false;
                    while let Some(node) = cur {
                        collected.push((&node.key, &node.val));
                        any = true;
                        cur = node.next.as_deref();
                        if collected.len() >= count {
                            break;
                        }
                    }
                    empty_run = if any { 0 } else { empty_run + 1 };
                }
                None => empty_run += 1,
            }

            if empty_run >= MIN_EMPTY_RUN_FOR_RESEED && count >= MIN_EMPTY_RUN_FOR_RESEED {
                idx = rng.gen_range(0..=max_mask);
                empty_run = 0;
            } else {
                idx = (idx + 1) & max_mask;
            }
        }

        collected
    }

    fn visible_bucket(
        &self,
        idx: u64,
    ) -> Option<(usize, usize)> {
        let idx = idx as usize;

        if self.table_ref(0).capacity() > 0
            && idx <= self.table_ref(0).mask
            && (!self.is_rehashing() || idx >= self.rehash_index() as usize)
        {
            return Some((0, idx));
        }
        if self.table_ref(1).capacity() > 0 && idx <= self.table_ref(1).mask {
            return Some((1, idx));
        }
        None
    }

    /// Collects up to 15 entries via [`Dict::sample_k`] and returns a
    /// uniformly random one among them; falls back to [`Dict::random_entry`]
    /// if none were collected.
    pub fn fair_random_entry(&mut self) -> Option<(&K, &V)> {
        let mut picked = self.sample_k(FAIR_SAMPLE_SIZE);
        if picked.is_empty() {
            return self.random_entry();
        }
        let mut rng = rand::thread_rng();
        let i = rng.gen_range(0..picked.len());
        Some(picked.swap_remove(i))
    }
}

#[cfg(test)]
mod tests {
    use crate::Dict;

    #[test]
    fn random_entry_on_empty_dict_is_none() {
        let d: Dict<u32, u32> = Dict::new();
        assert_eq!(d.random_entry(), None);
    }

    #[test]
    fn random_entry_returns_a_live_key() {
        let mut d = Dict::new();
        for i in 0..30u32 {
            d.insert(i, i * 10);
        }
        let (k, v) = d.random_entry().expect("non-empty dict must sample something");
        assert_eq!(d.get(k), Some(v));
    }

    #[test]
    fn sample_k_respects_requested_count_upper_bound() {
        let mut d = Dict::new();
        for i in 0..200u32 {
            d.insert(i, i);
        }
        let sampled = d.sample_k(10);
        assert!(sampled.len() <= 10);
        for (k, v) in &sampled {
            assert_eq!(d.get(k), Some(*v));
        }
    }

    #[test]
    fn sample_k_on_empty_dict_is_empty() {
        let mut d: Dict<u32, u32> = Dict::new();
        assert!(d.sample_k(5).is_empty());
    }

    #[test]
    fn sample_k_zero_count_is_empty() {
        let mut d = Dict::new();
        d.insert(1u32, 1u32);
        assert!(d.sample_k(0).is_empty());
    }

    #[test]
    fn fair_random_entry_returns_live_key() {
        let mut d = Dict::new();
        for i in 0..500u32 {
            d.insert(i, i);
        }
        let (k, v) = d.fair_random_entry().expect("non-empty dict");
        assert_eq!(d.get(k), Some(v));
    }
}
