mod dict_base;
mod entry;
mod hash;
mod iter;
mod node;
mod sample;
mod scan;
mod stats;

// Publicly re-export the dictionary's surface; `node` stays crate-internal
// (entries are never exposed directly, only through `get`/`get_mut`/`Entry`).
pub use dict_base::{Dict, RehashStatus, Replaced, UnlinkedEntry};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use hash::{
    case_insensitive_hash, disable_resize, enable_resize, get_hash_seed, resize_enabled,
    set_hash_seed, siphash, DictHashState,
};
pub use iter::{Iter, IterMut, SafeIter};
pub use stats::TableStats;
