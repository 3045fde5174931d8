//! Test configuration
//!
//! The configuration file is named by the `CATTLE_TEST_CONFIG` environment
//! variable and holds a `rancher` section:
//!
//! ```yaml
//! rancher:
//!   host: rancher.example.com
//!   adminToken: token-abcde:xyz
//!   clusterName: downstream
//!   insecure: true
//!   cleanup: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "CATTLE_TEST_CONFIG";

/// Top-level key of the Rancher section
pub const CONFIG_KEY: &str = "rancher";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Missing required config field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RancherConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(default = "default_true")]
    pub insecure: bool,
    #[serde(default = "default_true")]
    pub cleanup: bool,
    #[serde(default)]
    pub cluster_name: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rancher: Option<RancherConfig>,
}

impl RancherConfig {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            admin_token: None,
            admin_password: None,
            insecure: true,
            cleanup: true,
            cluster_name: String::new(),
        }
    }

    /// Load from the file named by `CATTLE_TEST_CONFIG`
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(CONFIG_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, ConfigError> {
        match value {
            Some(path) if !path.is_empty() => Self::from_path(path),
            _ => Err(ConfigError::MissingEnv(CONFIG_ENV)),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a configuration document. JSON documents are accepted too.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let config = file.rancher.ok_or(ConfigError::MissingField(CONFIG_KEY))?;

        if config.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host"));
        }

        Ok(config)
    }

    /// Write the configuration under its `rancher` key
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_yaml::to_string(&ConfigFile {
            rancher: Some(self.clone()),
        })?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.admin_token = Some(token.to_string());
        self
    }

    pub fn with_cluster_name(mut self, cluster_name: &str) -> Self {
        self.cluster_name = cluster_name.to_string();
        self
    }

    /// Base URL of the Rancher server. Hosts without a scheme are served over https.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}
