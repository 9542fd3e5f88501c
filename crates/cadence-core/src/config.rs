use serde::{Deserialize, Serialize};

use crate::error::CadenceResult;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Real milliseconds waited per logical millisecond played.
    pub time_scale: f64,
    /// Give up waiting for effects to become ready after this many milliseconds.
    pub ready_timeout_ms: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            ready_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String, // tracing EnvFilter directive, e.g. "info" or "cadence_sync=debug"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CadenceConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CadenceConfig {
    pub fn from_toml_str(contents: &str) -> CadenceResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from_file(path: &std::path::Path) -> CadenceResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> CadenceResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CadenceConfig::from_toml_str("").unwrap();
        assert_eq!(config.playback.time_scale, 1.0);
        assert!(config.playback.ready_timeout_ms.is_none());
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = CadenceConfig::from_toml_str(
            "[playback]\ntime_scale = 0.5\nready_timeout_ms = 2000\n",
        )
        .unwrap();
        assert_eq!(config.playback.time_scale, 0.5);
        assert_eq!(config.playback.ready_timeout_ms, Some(2000));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_single_key_section_keeps_other_defaults() {
        let config = CadenceConfig::from_toml_str("[playback]\nready_timeout_ms = 2000\n").unwrap();
        assert_eq!(config.playback.ready_timeout_ms, Some(2000));
        assert_eq!(config.playback.time_scale, 1.0);

        let config = CadenceConfig::from_toml_str("[logging]\n").unwrap();
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let err = CadenceConfig::from_toml_str("[playback]\ntime_scale = \"fast\"\n").unwrap_err();
        assert!(matches!(err, crate::CadenceError::ConfigParse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("cadence-config-{}.toml", std::process::id()));
        let mut config = CadenceConfig::default();
        config.logging.filter = "cadence_sync=debug".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = CadenceConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.logging.filter, "cadence_sync=debug");
        let _ = std::fs::remove_file(&path);
    }
}
