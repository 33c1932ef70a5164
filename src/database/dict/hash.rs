use std::{
    hash::{BuildHasher, Hasher},
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use siphasher::sip::SipHasher13;

static RESIZE_ENABLED: AtomicBool = AtomicBool::new(true);
static HASH_SEED_LO: AtomicU64 = AtomicU64::new(0x0123_4567_89ab_cdef);
static HASH_SEED_HI: AtomicU64 = AtomicU64::new(0xfedc_ba98_7654_3210);

/// Re-enables automatic growth for every dictionary in the process.
///
/// `resize_enabled` is process-wide, not per-dictionary: see §5 of the
/// growth/shrink policy this crate implements.
pub fn enable_resize() {
    RESIZE_ENABLED.store(true, Ordering::Relaxed);
}

/// Disables automatic growth; dictionaries still grow once
/// `used / capacity` exceeds `force_resize_ratio`.
pub fn disable_resize() {
    RESIZE_ENABLED.store(false, Ordering::Relaxed);
}

pub fn resize_enabled() -> bool {
    RESIZE_ENABLED.load(Ordering::Relaxed)
}

/// Installs the process-wide 128-bit hash seed. Not safe to call while any
/// dictionary is in concurrent use; intended for startup.
pub fn set_hash_seed(seed: [u8; 16]) {
    let lo = u64::from_le_bytes(seed[0..8].try_into().unwrap());
    let hi = u64::from_le_bytes(seed[8..16].try_into().unwrap());
    HASH_SEED_LO.store(lo, Ordering::Relaxed);
    HASH_SEED_HI.store(hi, Ordering::Relaxed);
}

pub fn get_hash_seed() -> [u8; 16] {
    let lo = HASH_SEED_LO.load(Ordering::Relaxed);
    let hi = HASH_SEED_HI.load(Ordering::Relaxed);
    let mut seed = [0u8; 16];
    seed[0..8].copy_from_slice(&lo.to_le_bytes());
    seed[8..16].copy_from_slice(&hi.to_le_bytes());
    seed
}

/// [`BuildHasher`] over the process-wide 128-bit seed; the default hasher for
/// [`super::Dict`]. Swap in any other `BuildHasher` via `with_hasher` when the
/// keyed SipHash is not desired.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictHashState;

impl BuildHasher for DictHashState {
    type Hasher = SipHasher13;

    fn build_hasher(&self) -> SipHasher13 {
        let lo = HASH_SEED_LO.load(Ordering::Relaxed);
        let hi = HASH_SEED_HI.load(Ordering::Relaxed);
        SipHasher13::new_with_keys(lo, hi)
    }
}

/// Hashes a byte string under the current process-wide seed.
pub fn siphash(bytes: &[u8]) -> u64 {
    let mut hasher = DictHashState.build_hasher();
    hasher.write(bytes);
    hasher.finish()
}

/// Case-insensitive variant of [`siphash`]: lower-cases ASCII bytes before
/// hashing. Non-ASCII bytes are passed through unchanged.
pub fn case_insensitive_hash(bytes: &[u8]) -> u64 {
    let lowered: Vec<u8> = bytes.iter().map(u8::to_ascii_lowercase).collect();
    siphash(&lowered)
}

/// Integer-avalanche finalizer (splitmix64's), used to build the
/// dictionary's structural fingerprint from raw field values.
pub(crate) fn avalanche(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

// These tests touch process-wide statics (hash seed, resize flag), so they
// are run serially to avoid cross-test interference.
#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn siphash_is_deterministic_under_fixed_seed() {
        set_hash_seed([7; 16]);
        let a = siphash(b"hello");
        let b = siphash(b"hello");
        assert_eq!(a, b);
    }

    #[test]
    #[serial]
    fn siphash_differs_by_seed() {
        set_hash_seed([1; 16]);
        let a = siphash(b"hello");
        set_hash_seed([2; 16]);
        let b = siphash(b"hello");
        assert_ne!(a, b);
    }

    #[test]
    #[serial]
    fn case_insensitive_hash_ignores_ascii_case() {
        set_hash_seed([3; 16]);
        assert_eq!(case_insensitive_hash(b"Hello"), case_insensitive_hash(b"HELLO"));
    }

    #[test]
    #[serial]
    fn resize_flag_round_trips() {
        disable_resize();
        assert!(!resize_enabled());
        enable_resize();
        assert!(resize_enabled());
    }

    #[test]
    #[serial]
    fn get_hash_seed_round_trips_set_hash_seed() {
        let seed = [9u8; 16];
        set_hash_seed(seed);
        assert_eq!(get_hash_seed(), seed);
    }

    #[test]
    fn avalanche_is_not_identity() {
        assert_ne!(avalanche(1), 1);
    }
}
