use std::fmt::Write as _;
use std::hash::{BuildHasher, Hash};

use super::dict_base::Dict;

const HISTOGRAM_CAP: usize = 50;

/// Occupancy snapshot for a single subtable, used to build [`Dict::stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub capacity: usize,
    pub used: usize,
    pub non_empty_buckets: usize,
    pub max_chain_length: usize,
    /// chain-length histogram, index `i` counts buckets with `i` entries,
    /// `i == HISTOGRAM_CAP - 1` is an overflow bucket for longer chains.
    pub histogram: Vec<usize>,
}

impl TableStats {
    /// Mean chain length counted over every bucket (empty buckets count as
    /// zero-length chains).
    pub fn mean_chain_length(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.used as f64 / self.capacity as f64
        }
    }

    /// Mean chain length counted only over non-empty buckets.
    pub fn mean_occupied_chain_length(&self) -> f64 {
        if self.non_empty_buckets == 0 {
            0.0
        } else {
            self.used as f64 / self.non_empty_buckets as f64
        }
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn table_stats(
        &self,
        idx: usize,
    ) -> TableStats {
        let table = self.table_ref(idx);
        let capacity = table.capacity();
        let mut non_empty_buckets = 0usize;
        let mut max_chain_length = 0usize;
        let mut histogram = vec![0usize; HISTOGRAM_CAP];

        for bucket in &table.buckets {
            let mut len = 0usize;
            let mut cur = bucket.as_deref();
            while let Some(node) = cur {
                len += 1;
                cur = node.next.as_deref();
            }
            if len > 0 {
                non_empty_buckets += 1;
                max_chain_length = max_chain_length.max(len);
                let slot = len.min(HISTOGRAM_CAP - 1);
                histogram[slot] += 1;
            }
        }

        TableStats {
            capacity,
            used: table.used,
            non_empty_buckets,
            max_chain_length,
            histogram,
        }
    }

    /// Per-subtable occupancy statistics, primary first, secondary second
    /// (the secondary is empty outside a rehash).
    pub fn table_stats_all(&self) -> [TableStats; 2] {
        [self.table_stats(0), self.table_stats(1)]
    }

    /// Human-readable diagnostic report, in the same spirit as the source's
    /// `dictGetStats` text dump: one block per non-empty subtable, capacity,
    /// live entries, non-empty buckets, max and mean chain length, and a
    /// histogram of chain lengths capped at [`HISTOGRAM_CAP`] buckets.
    pub fn stats(&self) -> String {
        let mut out = String::new();
        for (idx, label) in [(0, "primary"), (1, "rehashing target")] {
            let s = self.table_stats(idx);
            if s.capacity == 0 {
                continue;
            }
            let _ = writeln!(out, "[{label} table]");
            let _ = writeln!(out, "  capacity: {}", s.capacity);
            let _ = writeln!(out, "  used: {}", s.used);
            let _ = writeln!(out, "  non-empty buckets: {}", s.non_empty_buckets);
            let _ = writeln!(out, "  max chain length: {}", s.max_chain_length);
            let _ = writeln!(
                out,
                "  mean chain length (all buckets): {:.4}",
                s.mean_chain_length()
            );
            let _ = writeln!(
                out,
                "  mean chain length (occupied buckets): {:.4}",
                s.mean_occupied_chain_length()
            );
            let _ = write!(out, "  chain length histogram:");
            for (len, count) in s.histogram.iter().enumerate() {
                if *count > 0 {
                    let _ = write!(out, " {len}:{count}");
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::Dict;

    #[test]
    fn empty_dict_reports_nothing() {
        let d: Dict<u32, u32> = Dict::new();
        assert_eq!(d.stats(), "");
    }

    #[test]
    fn stats_reflect_inserted_entries() {
        let mut d = Dict::new();
        for i in 0..64u32 {
            d.insert(i, i);
        }
        let stats = d.table_stats_all();
        let primary = &stats[0];
        assert_eq!(primary.used, 64);
        assert!(primary.capacity >= 64);
        assert!(primary.max_chain_length >= 1);
        assert!(d.stats().contains("primary table"));
    }

    #[test]
    fn mean_chain_length_matches_used_over_capacity() {
        let mut d = Dict::new();
        for i in 0..10u32 {
            d.insert(i, i);
        }
        let stats = d.table_stats_all();
        let primary = &stats[0];
        let expected = primary.used as f64 / primary.capacity as f64;
        assert!((primary.mean_chain_length() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn histogram_counts_sum_to_non_empty_buckets() {
        let mut d = Dict::new();
        for i in 0..300u32 {
            d.insert(i, i);
        }
        let stats = d.table_stats_all();
        let primary = &stats[0];
        let total: usize = primary.histogram.iter().sum();
        assert_eq!(total, primary.non_empty_buckets);
    }
}
