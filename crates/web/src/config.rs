//! Web server configuration
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file, `TASKLIST_*` environment variables, command-line flags.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use tasklist_common::{Error, Result, DEFAULT_SEED};

pub const ENV_HOST: &str = "TASKLIST_WEB_HOST";
pub const ENV_PORT: &str = "TASKLIST_WEB_PORT";
pub const ENV_MAX_SESSIONS: &str = "TASKLIST_MAX_SESSIONS";
pub const ENV_SEED: &str = "TASKLIST_SEED";

/// Separator for `TASKLIST_SEED`
const SEED_SEPARATOR: char = '|';

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen host
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Maximum number of live browser sessions kept in memory
    pub max_sessions: usize,

    /// Tasks each new session starts with
    pub seed: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_sessions: 1024,
            seed: DEFAULT_SEED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WebConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.host = host.trim().to_string();
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{} is not a port: {}", ENV_PORT, port)))?;
        }

        if let Some(max) = lookup(ENV_MAX_SESSIONS) {
            self.max_sessions = max.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{} is not a number: {}", ENV_MAX_SESSIONS, max))
            })?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = parse_seed(&seed);
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sessions == 0 {
            return Err(Error::InvalidConfig("max_sessions must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Socket address to bind. `host` may be an IPv4/IPv6 literal or a name
    /// such as `localhost`; the first resolved address wins.
    pub async fn addr(&self) -> Result<SocketAddr> {
        let invalid = || Error::InvalidConfig(format!("invalid listen host {:?}", self.host));
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }
}

/// Split a `|`-separated seed list. An empty string means no seed tasks.
fn parse_seed(raw: &str) -> Vec<String> {
    raw.split(SEED_SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
        .collect()
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

    #[tokio::test]
    async fn test_default_config() {
        let config = WebConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.seed, vec!["Learn React", "Build a todo app", "Master JavaScript"]);
        assert_eq!(config.addr().await.unwrap().to_string(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_addr_accepts_ipv6_and_names() {
        let v6 = WebConfig { host: "::1".to_string(), port: 9000, ..Default::default() };
        assert_eq!(v6.addr().await.unwrap().to_string(), "[::1]:9000");

        let named = WebConfig { host: "localhost".to_string(), port: 9000, ..Default::default() };
        let addr = named.addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);
    }

    #[tokio::test]
    async fn test_addr_rejects_garbage_host() {
        let config = WebConfig { host: "not a host".to_string(), ..Default::default() };
        assert!(matches!(config.addr().await, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WebConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WebConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.toml");
        std::fs::write(&path, "port = 9000\nseed = [\"only\"]\n").unwrap();

        let config = WebConfig::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.seed, vec!["only"]);
    }

    #[test]
    fn test_load_rejects_zero_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.toml");
        std::fs::write(&path, "max_sessions = 0\n").unwrap();
        assert!(matches!(WebConfig::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WebConfig::default();
        config
            .apply_env_from(env(&[
                (ENV_HOST, "0.0.0.0"),
                (ENV_PORT, "3000"),
                (ENV_SEED, "a|b| |c"),
            ]))
            .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.seed, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_seed_env_clears_seed() {
        let mut config = WebConfig::default();
        config.apply_env_from(env(&[(ENV_SEED, "")])).unwrap();
        assert!(config.seed.is_empty());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = WebConfig::default();
        let err = config.apply_env_from(env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }
}
