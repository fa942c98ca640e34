use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, SessionsError};

pub const DEFAULT_CONFIG_PATH: &str = "server/config/sessions.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 256 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Mongo => "mongo",
            StoreBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = SessionsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(SessionsError::Config(format!(
                "Unknown session store backend '{}'",
                other
            ))),
        }
    }
}

/// Connection settings for the sessions collection.
///
/// The password never comes from the config file; it is injected from
/// `MONGODB_PASSWORD` and redacted from `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub user: String,
    pub host: String,
    pub auth_database: String,
    pub options: String,
    pub database: String,
    pub collection: String,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip)]
    pub uri: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongo,
            user: "client".to_string(),
            host: "personal-3effx.azure.mongodb.net".to_string(),
            auth_database: "test".to_string(),
            options: "retryWrites=true&w=majority".to_string(),
            database: "timeTracker".to_string(),
            collection: "sessions".to_string(),
            password: None,
            uri: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("user", &self.user)
            .field("host", &self.host)
            .field("auth_database", &self.auth_database)
            .field("options", &self.options)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl StoreConfig {
    /// Connection string for the MongoDB driver. An explicit `uri` wins over
    /// the assembled `mongodb+srv` form.
    pub fn connection_uri(&self) -> Result<String> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let password = self.password.as_deref().ok_or_else(|| {
            SessionsError::Config("MONGODB_PASSWORD is not set".to_string())
        })?;

        let mut uri = format!(
            "mongodb+srv://{}:{}@{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(password),
            self.host,
            self.auth_database
        );
        if !self.options.is_empty() {
            uri.push('?');
            uri.push_str(&self.options);
        }
        Ok(uri)
    }
}

impl ServerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SessionsError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: ServerConfig = toml::from_str(&content).map_err(|e| {
            SessionsError::Config(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Reads the optional config file, then applies process environment
    /// overrides. A missing file falls back to built-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            log::warn!(
                "Config file '{}' not found, using built-in defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(password) = lookup("MONGODB_PASSWORD") {
            self.store.password = Some(password);
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.store.uri = Some(uri);
        }
        if let Some(backend) = lookup("SESSION_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.http.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.http.port = port.parse().map_err(|e| {
                SessionsError::Config(format!("Invalid SERVER_PORT '{}': {}", port, e))
            })?;
        }

        Ok(())
    }
}
