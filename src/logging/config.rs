use std::{env, error::Error, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Output encoding for a logging sink.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        };
        write!(f, "{s}")
    }
}

/// File rotation policy for the file sink.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    Daily,
    Hourly,
    Never,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        RotationPolicy::Daily
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub with_ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Pretty,
            with_ansi: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub rotation: RotationPolicy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: default_filename(),
            format: LogFormat::Json,
            rotation: RotationPolicy::Daily,
        }
    }
}

/// Top-level logging configuration, loaded via [`crate::config::Settings`]
/// and overridable through `RDICT_LOG_*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_true")]
    pub console_enabled: bool,
    #[serde(default)]
    pub file_enabled: bool,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub file: FileConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: default_log_dir(),
            console_enabled: true,
            file_enabled: false,
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Overlays `RDICT_LOG_LEVEL` / `RDICT_LOG_DIR` on top of whatever was
    /// loaded from file or defaults.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("RDICT_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(dir) = env::var("RDICT_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.level.trim().is_empty() {
            return Err("log level cannot be empty".into());
        }
        if self.file_enabled && self.file.filename.trim().is_empty() {
            return Err("file sink is enabled but filename is empty".into());
        }
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> std::io::Result<()> {
        if self.file_enabled {
            std::fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }

    pub fn console_format(&self) -> LogFormat {
        self.console.format
    }

    pub fn file_format(&self) -> LogFormat {
        self.file.format
    }

    pub fn file_rotation(&self) -> RotationPolicy {
        self.file.rotation
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_filename() -> String {
    "rdict.log".to_string()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LoggingConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
    }

    #[test]
    fn rejects_empty_level() {
        let mut config = LoggingConfig::default();
        config.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_override_noop_when_var_absent() {
        let mut config = LoggingConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.level, default_level());
    }

    #[test]
    fn ensure_log_dir_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested").join("logs");

        let mut config = LoggingConfig::default();
        config.file_enabled = true;
        config.log_dir = target.clone();

        assert!(!target.exists());
        config.ensure_log_dir().unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn ensure_log_dir_is_noop_when_file_sink_disabled() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("unused_logs");

        let mut config = LoggingConfig::default();
        config.file_enabled = false;
        config.log_dir = target.clone();

        config.ensure_log_dir().unwrap();
        assert!(!target.exists());
    }
}
