use std::time::Duration;
use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitoring::classifier::DEFAULT_FAILURE_PATTERNS;
use crate::validation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[source] std::io::Error),
    #[error("Failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("Could not determine a config directory")]
    ConfigPathUnavailable,
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub probe: ProbeSettings,
    pub classifier: ClassifierSettings,
    pub history: HistorySettings,
    pub scheduler: SchedulerSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8080 }
    }
}

/// Outbound request settings for the HTTP prober
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub accept: String,
    pub max_body_bytes: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "VigilMonitor/1.0 (HealthCheck)".into(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub failure_patterns: Vec<String>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self { failure_patterns: DEFAULT_FAILURE_PATTERNS.iter().map(|p| p.to_string()).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub capacity: usize,
    pub heartbeat_seconds: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: crate::models::HISTORY_CAPACITY, heartbeat_seconds: 300 }
    }
}

impl HistorySettings {
    pub fn heartbeat_ms(&self) -> i64 {
        i64::try_from(self.heartbeat_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub enabled: bool,
    pub sweep_interval_seconds: u64,
    pub max_concurrent_checks: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { enabled: true, sweep_interval_seconds: 60, max_concurrent_checks: 8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Libsql,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Libsql => write!(f, "libsql"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
    pub pool_size: usize,
    pub seed_demo_data: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: "vigil.db".into(),
            pool_size: 4,
            seed_demo_data: true,
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/vigil/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("vigil/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_title_1(f, "Probe")?;
        write_1(f, "Timeout (s)", &self.probe.timeout_seconds)?;
        write_1(f, "User Agent", &self.probe.user_agent)?;
        write_1(f, "Max Body Bytes", &self.probe.max_body_bytes)?;
        write_title_1(f, "Classifier")?;
        write_1(f, "Failure Patterns", &self.classifier.failure_patterns.join(", "))?;
        write_title_1(f, "History")?;
        write_1(f, "Capacity", &self.history.capacity)?;
        write_1(f, "Heartbeat (s)", &self.history.heartbeat_seconds)?;
        write_title_1(f, "Scheduler")?;
        write_1(f, "Enabled", &self.scheduler.enabled)?;
        write_1(f, "Sweep Interval (s)", &self.scheduler.sweep_interval_seconds)?;
        write_1(f, "Max Concurrent Checks", &self.scheduler.max_concurrent_checks)?;
        write_title_1(f, "Storage")?;
        write_1(f, "Backend", &self.storage.backend)?;
        write_1(f, "Path", &self.storage.path)?;
        write_1(f, "Seed Demo Data", &self.storage.seed_demo_data)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/vigil/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::ReadFailed)?;
            Self::parse(&raw_string)?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(ConfigError::WriteFailed)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeout = validation::validate_timeout(self.probe.timeout_seconds);
        if let Some(error) = timeout.error {
            return Err(ConfigError::Invalid(error));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be at least 1".into()));
        }
        if self.scheduler.max_concurrent_checks == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.max_concurrent_checks must be at least 1".into(),
            ));
        }
        if self.scheduler.sweep_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.sweep_interval_seconds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe.timeout(), Duration::from_secs(10));
        assert_eq!(config.history.capacity, 50);
        assert_eq!(config.history.heartbeat_ms(), 300_000);
        assert_eq!(config.classifier.failure_patterns.len(), 6);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::parse(
            r#"
            [probe]
            timeout_seconds = 5

            [storage]
            backend = "libsql"
            path = "/tmp/vigil.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.probe.timeout_seconds, 5);
        assert_eq!(config.probe.max_body_bytes, 1024 * 1024);
        assert_eq!(config.storage.backend, StorageBackend::Libsql);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.probe.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.scheduler.max_concurrent_checks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_config_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config");

        let config = Config::from_config(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("nested/config.toml").exists());

        let reloaded = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_display_lists_sections() {
        let rendered = Config::default().to_string();
        assert!(rendered.contains("Probe"));
        assert!(rendered.contains("Timeout (s): 10"));
        assert!(rendered.contains("Backend: memory"));
    }
}
