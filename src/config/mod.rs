//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `PHEW_CONFIG`) and are
//! then overridden by environment variables. The variable names follow the
//! conventional `PORT` / `DATABASE_URL` / `MAIL_*` scheme.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::ConfigError;
use crate::storage::retry::RetryPolicy;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_VAR: &str = "PHEW_CONFIG";

/// Listening address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage backend selection
///
/// Without a database URL the in-memory store is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub database_url: Option<String>,
}

/// Outbound mail settings
///
/// Without an SMTP server confirmations are logged instead of sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_server: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_email() -> String {
    "noreply@phew-events.example".to_string()
}

fn default_from_name() -> String {
    "Phew Event Management".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_server: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            file: path.to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Load the file named by `PHEW_CONFIG` (if any), then apply the process
    /// environment on top
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();

        let config = match env.get(CONFIG_PATH_VAR) {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        config.with_env(&env)
    }

    /// Apply environment overrides
    ///
    /// Empty values are ignored so that `PORT=` does not clobber the file.
    pub fn with_env(mut self, env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

        if let Some(port) = get("PORT") {
            self.server.port = parse_port("PORT", &port)?;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }
        if let Some(server) = get("MAIL_SERVER") {
            self.mail.smtp_server = Some(server);
        }
        if let Some(port) = get("MAIL_PORT") {
            self.mail.smtp_port = parse_port("MAIL_PORT", &port)?;
        }
        if let Some(username) = get("MAIL_USERNAME") {
            self.mail.username = Some(username);
        }
        if let Some(password) = get("MAIL_PASSWORD") {
            self.mail.password = Some(password);
        }
        if let Some(sender) = get("MAIL_DEFAULT_SENDER") {
            self.mail.from_email = sender;
        }

        Ok(self)
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
