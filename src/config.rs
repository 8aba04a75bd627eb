use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "orderscope.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "ORDERSCOPE_CONFIG";

pub const DEFAULT_DATA_PATH: &str = "./data/all_data.csv";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// orderscope.toml
// ---------------------------------------------------------------------------

/// Startup configuration. Every key is optional; unknown keys are ignored.
///
/// ```toml
/// data_path = "./data/all_data.csv"
/// log_level = "info"
///
/// [ui]
/// top_n = 5
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Entries shown in each ranked chart.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    /// Load from `$ORDERSCOPE_CONFIG` or `./orderscope.toml`.
    ///
    /// A missing default file yields the defaults; a missing file named by the
    /// environment variable is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_or_default(explicit.as_deref(), Path::new(CONFIG_FILE_NAME))
    }

    fn load_or_default(explicit: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None if default_path.exists() => Self::load_from(default_path),
            None => {
                log::debug!("No {} found, using defaults", default_path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(text)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.ui.top_n == 0 {
            return Err(ConfigError::Invalid {
                key: "ui.top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "data_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "log_level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data_path, PathBuf::from("./data/all_data.csv"));
        assert_eq!(config.ui.top_n, 5);
    }

    #[test]
    fn test_partial_file_and_unknown_keys() {
        let config = DashboardConfig::from_toml_str(
            "data_path = \"orders.parquet\"\ntheme = \"dark\"\n[ui]\ntop_n = 10\n",
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("orders.parquet"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.ui.top_n, 10);
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let err = DashboardConfig::from_toml_str("[ui]\ntop_n = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ui.top_n", .. }));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = DashboardConfig::from_toml_str("data_path = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = DashboardConfig::load_from(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DashboardConfig::load_or_default(None, &dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_default_file_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[ui]\ntop_n = 8\n").unwrap();
        let config = DashboardConfig::load_or_default(None, &path).unwrap();
        assert_eq!(config.ui.top_n, 8);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("elsewhere.toml");
        let err = DashboardConfig::load_or_default(Some(&missing), Path::new(CONFIG_FILE_NAME))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    // The only test that touches the process environment.
    #[test]
    fn test_env_var_overrides_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"orders.json\"\nlog_level = \"warn\"").unwrap();
        std::env::set_var(CONFIG_ENV_VAR, file.path());
        let loaded = DashboardConfig::load();
        std::env::remove_var(CONFIG_ENV_VAR);

        let config = loaded.unwrap();
        assert_eq!(config.data_path, PathBuf::from("orders.json"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = DashboardConfig::load_from(Path::new("/nonexistent/orderscope.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
