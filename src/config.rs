//! Configuration module for contact-relay.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::mail::TransportConfig;
use crate::{RelayError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the built site as static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_path() -> String {
    "dist".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| RelayError::Config(format!("invalid server address: {e}")))
    }
}

/// Contact form configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    /// Subject line prefix; the sender's name is appended.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Reject submissions that do not carry a server-issued challenge token.
    #[serde(default)]
    pub require_signed_challenge: bool,
    /// Secret for signing challenge tokens. Random per process when empty.
    #[serde(default)]
    pub challenge_secret: String,
    /// Challenge token lifetime in seconds.
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_secs: u64,
}

fn default_subject_prefix() -> String {
    "New contact-form message".to_string()
}

fn default_challenge_ttl() -> u64 {
    600 // 10 minutes
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            subject_prefix: default_subject_prefix(),
            require_signed_challenge: false,
            challenge_secret: String::new(),
            challenge_ttl_secs: default_challenge_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/contact-relay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// SMTP transport configuration.
    #[serde(default)]
    pub smtp: TransportConfig,
    /// Contact form configuration.
    #[serde(default)]
    pub contact: ContactConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`, `SMTP_USER`, `SMTP_PASS`
    /// - `MAIL_TO`, `MAIL_FROM`, `MAIL_FROM_NAME`
    /// - `SMTP_TIMEOUT_SECS`
    /// - `CONTACT_CHALLENGE_SECRET`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored. Values that fail to parse are logged and
    /// ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("SMTP_HOST") {
            self.smtp.host = Some(host);
        }
        if let Some(port) = get("SMTP_PORT") {
            match port.trim().parse() {
                Ok(port) => self.smtp.port = Some(port),
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid SMTP_PORT"),
            }
        }
        if let Some(secure) = get("SMTP_SECURE") {
            self.smtp.implicit_tls = secure.trim().eq_ignore_ascii_case("true");
        }
        if let Some(user) = get("SMTP_USER") {
            self.smtp.username = Some(user);
        }
        if let Some(pass) = get("SMTP_PASS") {
            self.smtp.password = Some(pass);
        }
        if let Some(to) = get("MAIL_TO") {
            self.smtp.recipient = Some(to);
        }
        if let Some(from) = get("MAIL_FROM") {
            self.smtp.from_override = Some(from);
        }
        if let Some(name) = get("MAIL_FROM_NAME") {
            self.smtp.from_name = name;
        }
        if let Some(timeout) = get("SMTP_TIMEOUT_SECS") {
            match timeout.trim().parse() {
                Ok(secs) => self.smtp.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %timeout, "Ignoring invalid SMTP_TIMEOUT_SECS"),
            }
        }
        if let Some(secret) = get("CONTACT_CHALLENGE_SECRET") {
            self.contact.challenge_secret = secret;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the server address cannot be parsed
    /// - the SMTP timeout or the challenge lifetime is zero
    ///
    /// Incomplete SMTP settings are not an error here; they are reported on
    /// each submission instead.
    pub fn validate(&self) -> Result<()> {
        self.server.addr()?;

        if self.smtp.timeout_secs == 0 {
            return Err(RelayError::Config(
                "smtp.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.contact.challenge_ttl_secs == 0 {
            return Err(RelayError::Config(
                "contact.challenge_ttl_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
