//! Process configuration.
//!
//! Everything the server needs is read from the environment exactly once at
//! startup and frozen into [`Config`]. Request handlers receive the config
//! (or pieces of it) through constructors and never look at the environment
//! themselves.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ACCUKNOX_BASE_URL` | Base URL for all AccuKnox API calls | empty |
//! | `ACCUKNOX_API_TOKEN` | Bearer token | empty |
//! | `ACCUKNOX_TIMEOUT_SECS` | Per-request timeout | `30` |
//! | `SSL_CERT_FILE` / `SSL_KEY_FILE` | TLS certificate / key paths | unset |
//! | `SSL_CERT_DATA` / `SSL_KEY_DATA` | Inline PEM, overrides the paths | unset |
//! | `HOST`, `PORT`, `WORKERS` | HTTP listener | `0.0.0.0`, `8000`, `1` |

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::tls::TlsSource;

/// Default listener host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listener port
pub const DEFAULT_PORT: u16 = 8000;
/// Default tokio worker thread count
pub const DEFAULT_WORKERS: usize = 1;
/// Default AccuKnox request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// AccuKnox API settings
    pub api: ApiConfig,
    /// HTTP listener settings
    pub listen: ListenConfig,
    /// Where TLS material comes from (resolved later by the server)
    pub tls: TlsSource,
}

/// AccuKnox API settings
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

// Keeps the token out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "<empty>" } else { "<redacted>" })
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether both base URL and token are present
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.token.is_empty()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ListenConfig {
    /// Apply command-line overrides on top of the environment values
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        workers: Option<usize>,
    ) -> Result<Self> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(workers) = workers {
            if workers == 0 {
                return Err(Error::invalid_env("WORKERS", "0", "must be at least 1"));
            }
            self.workers = workers;
        }
        Ok(self)
    }

    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get("ACCUKNOX_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| Error::invalid_env("ACCUKNOX_TIMEOUT_SECS", raw.clone(), e))?;
                if secs == 0 {
                    return Err(Error::invalid_env("ACCUKNOX_TIMEOUT_SECS", raw, "must be at least 1"));
                }
                secs
            }
            None => DEFAULT_TIMEOUT_SECS,
        };

        let api = ApiConfig::new(
            get("ACCUKNOX_BASE_URL").unwrap_or_default(),
            get("ACCUKNOX_API_TOKEN").unwrap_or_default(),
        )
        .with_timeout(Duration::from_secs(timeout_secs));

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::invalid_env("PORT", raw.clone(), e))?,
            None => DEFAULT_PORT,
        };

        let workers = match get("WORKERS") {
            Some(raw) => {
                let n = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| Error::invalid_env("WORKERS", raw.clone(), e))?;
                if n == 0 {
                    return Err(Error::invalid_env("WORKERS", raw, "must be at least 1"));
                }
                n
            }
            None => DEFAULT_WORKERS,
        };

        let listen = ListenConfig {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            workers,
        };

        let tls = TlsSource {
            cert_file: get("SSL_CERT_FILE").map(PathBuf::from),
            key_file: get("SSL_KEY_FILE").map(PathBuf::from),
            cert_data: get("SSL_CERT_DATA"),
            key_data: get("SSL_KEY_DATA"),
        };

        Ok(Self { api, listen, tls })
    }
}
