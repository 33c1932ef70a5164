use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

use crate::database::{disable_resize, enable_resize, set_hash_seed};

/// Process-wide settings governing a dictionary's growth and hashing, loaded
/// from environment variables prefixed `RDICT_` (e.g. `RDICT_RESIZE_ENABLED`,
/// `RDICT_INITIAL_CAPACITY`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictConfig {
    /// Initial primary capacity requested on construction via
    /// [`crate::Dict::with_capacity`] call sites that read this config.
    pub initial_capacity: usize,
    /// Mirrors the process-wide `resize_enabled` flag; applied via
    /// [`DictConfig::apply`].
    pub resize_enabled: bool,
    /// Budget, in milliseconds, for a single [`crate::Dict::rehash_milliseconds`]
    /// call made by a background maintenance loop.
    pub rehash_ms_budget: u64,
    /// 32 hex characters (16 bytes) seeding the keyed hash; left unset to
    /// keep the default all-zero seed.
    pub hash_seed_hex: Option<String>,
}

impl Default for DictConfig {
    fn default() -> Self {
        DictConfig {
            initial_capacity: 4,
            resize_enabled: true,
            rehash_ms_budget: 1,
            hash_seed_hex: None,
        }
    }
}

impl DictConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .set_default("initial_capacity", 4)?
            .set_default("resize_enabled", true)?
            .set_default("rehash_ms_budget", 1)?
            .add_source(Environment::with_prefix("RDICT"))
            .build()?;

        cfg.try_deserialize()
    }

    /// Parses [`DictConfig::hash_seed_hex`], if set, into 16 raw bytes.
    pub fn hash_seed_bytes(&self) -> Result<Option<[u8; 16]>, ConfigError> {
        let Some(hex) = &self.hash_seed_hex else {
            return Ok(None);
        };
        if hex.len() != 32 {
            return Err(ConfigError::Message(format!(
                "hash_seed_hex must be exactly 32 hex characters, got {}",
                hex.len()
            )));
        }
        let mut seed = [0u8; 16];
        for (i, chunk) in seed.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| ConfigError::Message(e.to_string()))?;
            *chunk = byte;
        }
        Ok(Some(seed))
    }

    /// Applies `resize_enabled` and `hash_seed_hex` to the process-wide
    /// dictionary state. Call once at startup, before any `Dict` is built.
    pub fn apply(&self) -> Result<(), ConfigError> {
        if self.resize_enabled {
            enable_resize();
        } else {
            disable_resize();
        }
        if let Some(seed) = self.hash_seed_bytes()? {
            set_hash_seed(seed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = DictConfig::default();
        assert_eq!(cfg.initial_capacity, 4);
        assert!(cfg.resize_enabled);
        assert!(cfg.hash_seed_hex.is_none());
    }

    #[test]
    fn hash_seed_bytes_rejects_wrong_length() {
        let mut cfg = DictConfig::default();
        cfg.hash_seed_hex = Some("abcd".to_string());
        assert!(cfg.hash_seed_bytes().is_err());
    }

    #[test]
    fn hash_seed_bytes_parses_valid_hex() {
        let mut cfg = DictConfig::default();
        cfg.hash_seed_hex = Some("00112233445566778899aabbccddeeff".to_string()[..32].to_string());
        let seed = cfg.hash_seed_bytes().unwrap().unwrap();
        assert_eq!(seed[0], 0x00);
        assert_eq!(seed[1], 0x11);
    }
}
