//! Core database data structures.
//!
//! - `dict`: incrementally-rehashing chained hash dictionary.

pub mod dict;

pub use dict::{
    case_insensitive_hash, disable_resize, enable_resize, get_hash_seed, resize_enabled,
    set_hash_seed, siphash, DictHashState, Entry, OccupiedEntry, RehashStatus, Replaced,
    TableStats, UnlinkedEntry, VacantEntry,
};
pub use dict::{Dict, Iter, IterMut, SafeIter};
