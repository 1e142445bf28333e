//! # CLI Configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional YAML file passed with `--config`,
//! 3. `BADGEFED_*` environment variables.
//!
//! ```yaml
//! database_url: sqlite://badgefed.db
//! key_dir: keys
//! max_connections: 4
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const ENV_DATABASE_URL: &str = "BADGEFED_DATABASE_URL";
pub const ENV_KEY_DIR: &str = "BADGEFED_KEY_DIR";
pub const ENV_MAX_CONNECTIONS: &str = "BADGEFED_MAX_CONNECTIONS";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// SQLite connection URL.
    pub database_url: String,
    /// Directory holding one `<issuer_id>.pem` private key per issuer.
    pub key_dir: PathBuf,
    /// Connection pool size.
    pub max_connections: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://badgefed.db".to_string(),
            key_dir: PathBuf::from("keys"),
            max_connections: 4,
        }
    }
}

impl CliConfig {
    /// Load defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(dir) = lookup(ENV_KEY_DIR) {
            self.key_dir = PathBuf::from(dir);
        }
        if let Some(n) = lookup(ENV_MAX_CONNECTIONS) {
            self.max_connections = n
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_CONNECTIONS} must be a positive integer, got {n:?}"))?;
        }
        Ok(self)
    }

    /// Reject settings the pool cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.database_url.trim().is_empty() {
            bail!("database_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = CliConfig::default();
        assert_eq!(c.database_url, "sqlite://badgefed.db");
        assert_eq!(c.key_dir, PathBuf::from("keys"));
        assert_eq!(c.max_connections, 4);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_defaults_partially() {
        let c = CliConfig::from_yaml("key_dir: /etc/badgefed/keys\n").unwrap();
        assert_eq!(c.key_dir, PathBuf::from("/etc/badgefed/keys"));
        assert_eq!(c.database_url, "sqlite://badgefed.db");
        assert_eq!(CliConfig::from_yaml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(CliConfig::from_yaml("database: x\n").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let c = CliConfig::from_yaml("database_url: sqlite://file.db\nmax_connections: 2\n")
            .unwrap()
            .with_env(env(&[
                (ENV_DATABASE_URL, "sqlite://env.db"),
                (ENV_MAX_CONNECTIONS, "8"),
            ]))
            .unwrap();
        assert_eq!(c.database_url, "sqlite://env.db");
        assert_eq!(c.max_connections, 8);
    }

    #[test]
    fn bad_pool_size_rejected() {
        assert!(CliConfig::default()
            .with_env(env(&[(ENV_MAX_CONNECTIONS, "many")]))
            .is_err());
        let zero = CliConfig::default()
            .with_env(env(&[(ENV_MAX_CONNECTIONS, "0")]))
            .unwrap();
        assert!(zero.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badgefed.yaml");
        std::fs::write(&path, "key_dir: custom-keys\n").unwrap();
        let c = CliConfig::from_file(&path).unwrap();
        assert_eq!(c.key_dir, PathBuf::from("custom-keys"));
        assert!(CliConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }
}
