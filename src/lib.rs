//! rdict - an incrementally-rehashing chained hash dictionary.
//!
//! Main modules:
//! - `config` — crate configuration loading
//! - `database` — the dictionary data structure (`Dict`) and its supporting types
//! - `logging` — flexible logging (formatting, filters, sinks)

/// Crate configuration loading.
pub mod config;
/// The dictionary data structure (`Dict`) and its supporting types.
pub mod database;
/// Flexible logging (formatting, filters, sinks).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Configuration types.
pub use config::DictConfig;

/// The dictionary and its supporting types: entries, iterators, statistics.
pub use database::{
    case_insensitive_hash, disable_resize, enable_resize, get_hash_seed, resize_enabled,
    set_hash_seed, siphash, Dict, DictHashState, Entry, Iter, IterMut, OccupiedEntry,
    RehashStatus, Replaced, SafeIter, TableStats, UnlinkedEntry, VacantEntry,
};

/// Logging setup.
pub use logging::{init_logging, init_logging_simple, LoggingHandle};
