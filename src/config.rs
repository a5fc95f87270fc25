use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::api::{ApiConfig, DEFAULT_API_BASE};
use crate::domain::HostId;

pub const DEFAULT_AGENT_CONF: &str = "/etc/mackerel-agent/mackerel-agent.conf";
pub const DEFAULT_AGENT_ROOT: &str = "/var/lib/mackerel-agent";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("API key not found; set MACKEREL_APIKEY, pass --apikey or configure apikey in the agent conf")]
    MissingApiKey,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub fetch_concurrency: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("MKCTL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            fetch_concurrency: lookup("MKCTL_FETCH_CONCURRENCY")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1),
            request_timeout: lookup("MKCTL_REQUEST_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// The parts of the agent configuration file the client reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfig {
    pub apikey: Option<String>,
    pub apibase: Option<String>,
    pub root: Option<PathBuf>,
}

impl AgentConfig {
    /// Load the agent conf. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_ROOT))
    }

    /// Host ID of the local agent, stored in `<root>/id`
    pub fn local_host_id(&self) -> Result<Option<HostId>, ConfigError> {
        let path = self.root().join("id");
        match fs::read_to_string(&path) {
            Ok(content) => {
                let id = content.trim();
                Ok((!id.is_empty()).then(|| HostId::new(id)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Resolve API settings; explicit values win over the agent conf
    pub fn api_config(
        &self,
        apikey: Option<&str>,
        apibase: Option<&str>,
        timeout: Duration,
    ) -> Result<ApiConfig, ConfigError> {
        let api_key = apikey
            .filter(|k| !k.is_empty())
            .or(self.apikey.as_deref().filter(|k| !k.is_empty()))
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = apibase
            .filter(|b| !b.is_empty())
            .or(self.apibase.as_deref().filter(|b| !b.is_empty()))
            .unwrap_or(DEFAULT_API_BASE);

        Ok(ApiConfig::new(base_url, api_key).with_timeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("MKCTL_LOG_LEVEL", "debug"),
            ("MKCTL_FETCH_CONCURRENCY", "4"),
            ("MKCTL_REQUEST_TIMEOUT", "5"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_concurrency_falls_back() {
        let config = Config::from_lookup(|k| (k == "MKCTL_FETCH_CONCURRENCY").then(|| "0".to_string()));
        assert_eq!(config.fetch_concurrency, 1);
    }

    #[test]
    fn test_load_agent_conf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mackerel-agent.conf");
        fs::write(
            &path,
            "apikey = \"abc\"\nroot = \"/tmp/agent\"\n\n[host_status]\non_start = \"working\"\n",
        )
        .unwrap();

        let agent = AgentConfig::load(&path).unwrap();
        assert_eq!(agent.apikey.as_deref(), Some("abc"));
        assert_eq!(agent.root(), PathBuf::from("/tmp/agent"));
        assert!(agent.apibase.is_none());
    }

    #[test]
    fn test_missing_agent_conf_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgentConfig::load(&dir.path().join("nope.conf")).unwrap();
        assert!(agent.apikey.is_none());
        assert_eq!(agent.root(), PathBuf::from(DEFAULT_AGENT_ROOT));
    }

    #[test]
    fn test_invalid_agent_conf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.conf");
        fs::write(&path, "apikey = ").unwrap();
        assert!(matches!(AgentConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_local_host_id() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgentConfig {
            root: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(agent.local_host_id().unwrap().is_none());

        fs::write(dir.path().join("id"), "3yAYEDLXKL5\n").unwrap();
        assert_eq!(agent.local_host_id().unwrap(), Some(HostId::from("3yAYEDLXKL5")));
    }

    #[test]
    fn test_api_config_precedence() {
        let agent = AgentConfig {
            apikey: Some("from-conf".to_string()),
            apibase: Some("https://conf.example".to_string()),
            root: None,
        };
        let timeout = Duration::from_secs(30);

        let api = agent.api_config(Some("from-flag"), None, timeout).unwrap();
        assert_eq!(api.api_key, "from-flag");
        assert_eq!(api.base_url, "https://conf.example");

        let api = agent.api_config(Some(""), Some("https://flag.example"), timeout).unwrap();
        assert_eq!(api.api_key, "from-conf");
        assert_eq!(api.base_url, "https://flag.example");

        let api = AgentConfig {
            apikey: Some("k".to_string()),
            ..Default::default()
        }
        .api_config(None, None, timeout)
        .unwrap();
        assert_eq!(api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_api_config_requires_key() {
        let err = AgentConfig::default()
            .api_config(None, None, Duration::from_secs(30))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }
}
