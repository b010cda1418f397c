use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CairnConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub backup_path: String,
    /// Refresh the JSON backup after every successful save.
    pub write_backup: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_search_limit: usize,
    pub default_context_nodes: usize,
    /// How many context nodes a recorded interaction links to.
    pub interaction_context_nodes: usize,
    pub default_importance: f64,
    pub interaction_importance: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8765,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_cairn_dir();
        Self {
            db_path: dir.join("cairn.db").to_string_lossy().into_owned(),
            backup_path: dir.join("memory.json").to_string_lossy().into_owned(),
            write_backup: true,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_search_limit: 10,
            default_context_nodes: 20,
            interaction_context_nodes: 5,
            default_importance: 0.5,
            interaction_importance: 0.6,
        }
    }
}

/// Returns `~/.cairn/`, or `./.cairn/` when no home directory is known.
pub fn default_cairn_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cairn")
}

/// Returns the default config file path: `~/.cairn/config.toml`
pub fn default_config_path() -> PathBuf {
    default_cairn_dir().join("config.toml")
}

impl CairnConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CairnConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (CAIRN_DB, CAIRN_BACKUP, CAIRN_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CAIRN_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CAIRN_BACKUP") {
            self.storage.backup_path = val;
        }
        if let Ok(val) = std::env::var("CAIRN_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("retrieval.default_importance", self.retrieval.default_importance),
            ("retrieval.interaction_importance", self.retrieval.interaction_importance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{name} must be within [0.0, 1.0], got {value}");
            }
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the JSON backup path, expanding `~` if needed.
    pub fn resolved_backup_path(&self) -> PathBuf {
        expand_tilde(&self.storage.backup_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CairnConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.retrieval.default_context_nodes, 20);
        assert_eq!(config.retrieval.interaction_context_nodes, 5);
        assert!(config.storage.db_path.ends_with("cairn.db"));
        assert!(config.storage.backup_path.ends_with("memory.json"));
        assert!(config.storage.write_backup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9000

[storage]
db_path = "/tmp/test.db"
write_backup = false

[retrieval]
default_search_limit = 25
"#;
        let config: CairnConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert!(!config.storage.write_backup);
        assert_eq!(config.retrieval.default_search_limit, 25);
        // defaults still apply for unset fields
        assert_eq!(config.retrieval.default_importance, 0.5);
        assert!(config.storage.backup_path.ends_with("memory.json"));
    }

    #[test]
    fn out_of_range_importance_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retrieval]\ninteraction_importance = 1.5\n").unwrap();
        assert!(CairnConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = CairnConfig::default();
        std::env::set_var("CAIRN_DB", "/tmp/override.db");
        std::env::set_var("CAIRN_BACKUP", "/tmp/override.json");
        std::env::set_var("CAIRN_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.backup_path, "/tmp/override.json");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("CAIRN_DB");
        std::env::remove_var("CAIRN_BACKUP");
        std::env::remove_var("CAIRN_LOG_LEVEL");
    }

    #[test]
    fn tilde_expands_to_home() {
        assert_eq!(expand_tilde("/abs/path.db"), PathBuf::from("/abs/path.db"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.db"), home.join("x.db"));
        }
    }
}
