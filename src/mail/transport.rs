//! SMTP transport settings.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use super::MailError;

/// Process-wide SMTP settings.
///
/// Mandatory values are still `Option`s: a deployment may start without
/// them, in which case every submission reports a configuration error.
#[derive(Clone, Deserialize)]
pub struct TransportConfig {
    /// SMTP server hostname.
    #[serde(default)]
    pub host: Option<String>,
    /// SMTP server port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Use implicit TLS (SMTPS). Otherwise the connection starts in plain
    /// text and upgrades with STARTTLS when the server offers it.
    #[serde(default)]
    pub implicit_tls: bool,
    /// Username for authentication. Also the default sender address.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for authentication.
    #[serde(default)]
    pub password: Option<String>,
    /// Inbox that receives contact messages.
    #[serde(default)]
    pub recipient: Option<String>,
    /// Sender address used instead of the username.
    #[serde(default)]
    pub from_override: Option<String>,
    /// Display name of the sender.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_from_name() -> String {
    "Contact form".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            implicit_tls: false,
            username: None,
            password: None,
            recipient: None,
            from_override: None,
            from_name: default_from_name(),
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("implicit_tls", &self.implicit_tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .field("from_override", &self.from_override)
            .field("from_name", &self.from_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Returns the trimmed value when it is present and not blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TransportConfig {
    /// Settings for a Gmail account using an app password.
    pub fn gmail(
        username: impl Into<String>,
        password: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            host: Some("smtp.gmail.com".to_string()),
            port: Some(465),
            implicit_tls: true,
            username: Some(username.into()),
            password: Some(password.into()),
            recipient: Some(recipient.into()),
            ..Self::default()
        }
    }

    /// Delivery timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Names of the mandatory settings that are absent or blank.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if present(&self.host).is_none() {
            missing.push("host");
        }
        if self.port.is_none() {
            missing.push("port");
        }
        if present(&self.username).is_none() {
            missing.push("username");
        }
        if present(&self.password).is_none() {
            missing.push("password");
        }
        if present(&self.recipient).is_none() {
            missing.push("recipient");
        }
        missing
    }

    /// Check that every mandatory setting is present.
    pub fn is_complete(&self) -> bool {
        self.missing_settings().is_empty()
    }

    /// Resolve the settings needed for one delivery.
    ///
    /// Fails with [`MailError::MissingConfig`] naming the absent settings.
    pub fn resolve(&self) -> Result<SmtpSettings, MailError> {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            return Err(MailError::MissingConfig(missing.join(", ")));
        }

        let (Some(host), Some(port), Some(username), Some(password), Some(recipient)) = (
            present(&self.host),
            self.port,
            present(&self.username),
            present(&self.password),
            present(&self.recipient),
        ) else {
            return Err(MailError::MissingConfig("smtp".to_string()));
        };

        let from_address = present(&self.from_override).unwrap_or(username);

        Ok(SmtpSettings {
            host: host.to_string(),
            port,
            implicit_tls: self.implicit_tls,
            username: username.to_string(),
            password: password.to_string(),
            recipient: recipient.to_string(),
            from_address: from_address.to_string(),
            from_name: self.from_name.clone(),
            timeout: self.timeout(),
        })
    }
}

/// Fully resolved SMTP settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub implicit_tls: bool,
    pub username: String,
    pub password: String,
    pub recipient: String,
    /// Address the sending domain is authorized to use.
    pub from_address: String,
    pub from_name: String,
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("implicit_tls", &self.implicit_tls)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> TransportConfig {
        TransportConfig {
            host: Some("smtp.example.com".to_string()),
            port: Some(587),
            username: Some("site@example.com".to_string()),
            password: Some("hunter2".to_string()),
            recipient: Some("inbox@example.com".to_string()),
            ..TransportConfig::default()
        }
    }

    #[test]
    fn test_default_is_incomplete() {
        let config = TransportConfig::default();
        assert_eq!(
            config.missing_settings(),
            vec!["host", "port", "username", "password", "recipient"]
        );
        assert!(!config.is_complete());
        assert_eq!(config.from_name, "Contact form");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut config = complete();
        config.password = Some("   ".to_string());
        assert_eq!(config.missing_settings(), vec!["password"]);
    }

    #[test]
    fn test_resolve_uses_username_as_sender() {
        let settings = complete().resolve().unwrap();
        assert_eq!(settings.from_address, "site@example.com");
        assert_eq!(settings.recipient, "inbox@example.com");
        assert_eq!(settings.port, 587);
        assert!(!settings.implicit_tls);
    }

    #[test]
    fn test_resolve_prefers_from_override() {
        let mut config = complete();
        config.from_override = Some("no-reply@example.com".to_string());
        let settings = config.resolve().unwrap();
        assert_eq!(settings.from_address, "no-reply@example.com");
    }

    #[test]
    fn test_resolve_reports_missing_settings() {
        let mut config = complete();
        config.host = None;
        config.recipient = Some(String::new());

        match config.resolve() {
            Err(MailError::MissingConfig(names)) => assert_eq!(names, "host, recipient"),
            other => panic!("Expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_gmail_preset() {
        let config = TransportConfig::gmail("me@gmail.com", "app-password", "inbox@example.com");
        assert!(config.is_complete());
        assert_eq!(config.host.as_deref(), Some("smtp.gmail.com"));
        assert_eq!(config.port, Some(465));
        assert!(config.implicit_tls);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = complete();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));

        let settings = config.resolve().unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
    }
}
