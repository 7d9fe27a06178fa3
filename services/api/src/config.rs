//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub notes_file: PathBuf,
    /// Allowed browser origin; any origin when unset.
    pub cors_origin: Option<String>,
    pub mail: MailConfig,
}

/// Raw mail relay settings. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_secure: bool,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub email_from: Option<String>,
    pub email_to: Option<String>,
}

/// Mail settings with every required value present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
}

impl MailConfig {
    /// Resolves the complete settings, or the reason the relay cannot run.
    pub fn settings(&self) -> Result<MailSettings, String> {
        let (Some(host), Some(port), Some(user), Some(pass)) = (
            self.smtp_host.clone(),
            self.smtp_port,
            self.smtp_user.clone(),
            self.smtp_pass.clone(),
        ) else {
            return Err("Missing SMTP config (SMTP_HOST/SMTP_PORT/SMTP_USER/SMTP_PASS).".to_string());
        };
        let Some(to) = self.email_to.clone() else {
            return Err("Missing EMAIL_TO environment variable.".to_string());
        };
        let from = self.email_from.clone().unwrap_or_else(|| user.clone());
        Ok(MailSettings {
            host,
            port,
            secure: self.smtp_secure,
            user,
            pass,
            from,
            to,
        })
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // --- Load Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:4000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let notes_file = var("NOTES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/notes.json"));

        let cors_origin = var("CORS_ORIGIN");

        // --- Load Mail Relay Settings (all optional) ---
        let smtp_port = match var("SMTP_PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue("SMTP_PORT".to_string(), e.to_string())
            })?),
            None => None,
        };
        let mail = MailConfig {
            smtp_host: var("SMTP_HOST"),
            smtp_port,
            smtp_secure: var("SMTP_SECURE").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            smtp_user: var("SMTP_USER"),
            smtp_pass: var("SMTP_PASS"),
            email_from: var("EMAIL_FROM"),
            email_to: var("EMAIL_TO"),
        };

        Ok(Self {
            bind_address,
            log_level,
            notes_file,
            cors_origin,
            mail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.notes_file, PathBuf::from("./data/notes.json"));
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.mail, MailConfig::default());
    }

    #[test]
    fn mail_settings_are_read_and_blanks_ignored() {
        let config = load(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("SMTP_SECURE", "TRUE"),
            ("SMTP_USER", "  "),
            ("EMAIL_TO", "me@example.com"),
        ])
        .unwrap();
        assert_eq!(config.mail.smtp_port, Some(587));
        assert!(config.mail.smtp_secure);
        assert_eq!(config.mail.smtp_user, None);
        assert_eq!(config.mail.email_to.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn unparseable_values_are_invalid() {
        for (name, value) in [
            ("SMTP_PORT", "seventy"),
            ("BIND_ADDRESS", "not-an-address"),
            ("RUST_LOG", "chatty"),
        ] {
            match load(&[(name, value)]) {
                Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, name),
                other => panic!("expected {name} to be invalid, got {other:?}"),
            }
        }
    }

    fn full() -> MailConfig {
        MailConfig {
            smtp_host: Some("smtp.example.com".into()),
            smtp_port: Some(465),
            smtp_secure: true,
            smtp_user: Some("bot@example.com".into()),
            smtp_pass: Some("secret".into()),
            email_from: None,
            email_to: Some("me@example.com".into()),
        }
    }

    #[test]
    fn sender_defaults_to_smtp_user() {
        let settings = full().settings().unwrap();
        assert_eq!(settings.from, "bot@example.com");
        assert_eq!(settings.port, 465);
    }

    #[test]
    fn missing_smtp_values_are_reported_together() {
        let mail = MailConfig {
            smtp_pass: None,
            ..full()
        };
        assert_eq!(
            mail.settings().unwrap_err(),
            "Missing SMTP config (SMTP_HOST/SMTP_PORT/SMTP_USER/SMTP_PASS)."
        );
        assert!(MailConfig::default().settings().is_err());
    }

    #[test]
    fn missing_recipient_is_reported() {
        let mail = MailConfig {
            email_to: None,
            ..full()
        };
        assert_eq!(mail.settings().unwrap_err(), "Missing EMAIL_TO environment variable.");
    }
}
