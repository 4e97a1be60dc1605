//! Configuration module for noticeboard.
//!
//! Values come from an optional TOML file, then `NOTICEBOARD_*` environment
//! variables, then [`Config::validate`].

use serde::Deserialize;
use std::path::Path;

use crate::{NoticeBoardError, Result};

/// Minimum accepted length of the session secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 16;

/// Maximum accepted session lifetime, in seconds (one year).
pub const MAX_SESSION_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins. Credentials are only allowed when non-empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Mount the login/logout/check-login routes and the session layer.
    #[serde(default = "default_login_enabled")]
    pub login_enabled: bool,
    /// Secret used to sign the session cookie (must be set if login is enabled).
    #[serde(default)]
    pub session_secret: String,
    /// Session lifetime and cookie max-age in seconds.
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,
    /// Set the `Secure` attribute on the session cookie.
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    5810
}

fn default_login_enabled() -> bool {
    true
}

fn default_session_max_age() -> u64 {
    3600 // 1 hour
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            login_enabled: default_login_enabled(),
            session_secret: String::new(),
            session_max_age_secs: default_session_max_age(),
            cookie_secure: false,
        }
    }
}

/// Database configuration.
///
/// `host`, `port`, `user`, `password` and `name` are used by the MySQL
/// backend; `path` by the SQLite backend.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database server host.
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Database server port.
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database user.
    #[serde(default = "default_db_user")]
    pub user: String,
    /// Database password.
    #[serde(default)]
    pub password: String,
    /// Database (schema) name.
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_user() -> String {
    "root".to_string()
}

fn default_db_name() -> String {
    "mydb".to_string()
}

fn default_db_path() -> String {
    "data/noticeboard.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/noticeboard.log".to_string()
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
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NoticeBoardError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NoticeBoardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NOTICEBOARD_HOST`, `NOTICEBOARD_PORT`
    /// - `NOTICEBOARD_CORS_ORIGIN` (comma separated)
    /// - `NOTICEBOARD_LOGIN_ENABLED`
    /// - `NOTICEBOARD_SESSION_SECRET`
    /// - `NOTICEBOARD_COOKIE_SECURE`
    /// - `NOTICEBOARD_DB_HOST`, `NOTICEBOARD_DB_PORT`, `NOTICEBOARD_DB_USER`,
    ///   `NOTICEBOARD_DB_PASSWORD`, `NOTICEBOARD_DB_NAME`, `NOTICEBOARD_DB_PATH`
    /// - `NOTICEBOARD_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get("NOTICEBOARD_HOST") {
            self.web.host = host;
        }
        if let Some(port) = get("NOTICEBOARD_PORT") {
            self.web.port = parse_port("NOTICEBOARD_PORT", &port)?;
        }
        if let Some(origins) = get("NOTICEBOARD_CORS_ORIGIN") {
            self.web.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(enabled) = get("NOTICEBOARD_LOGIN_ENABLED") {
            self.web.login_enabled = parse_bool("NOTICEBOARD_LOGIN_ENABLED", &enabled)?;
        }
        if let Some(secret) = get("NOTICEBOARD_SESSION_SECRET") {
            self.web.session_secret = secret;
        }
        if let Some(secure) = get("NOTICEBOARD_COOKIE_SECURE") {
            self.web.cookie_secure = parse_bool("NOTICEBOARD_COOKIE_SECURE", &secure)?;
        }
        if let Some(host) = get("NOTICEBOARD_DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = get("NOTICEBOARD_DB_PORT") {
            self.database.port = parse_port("NOTICEBOARD_DB_PORT", &port)?;
        }
        if let Some(user) = get("NOTICEBOARD_DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = get("NOTICEBOARD_DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = get("NOTICEBOARD_DB_NAME") {
            self.database.name = name;
        }
        if let Some(path) = get("NOTICEBOARD_DB_PATH") {
            self.database.path = path;
        }
        if let Some(level) = get("NOTICEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - login is enabled but the session secret is missing or too short
    /// - the session max age is zero or longer than a year
    pub fn validate(&self) -> Result<()> {
        if self.web.login_enabled {
            if self.web.session_secret.is_empty() {
                return Err(NoticeBoardError::Validation(
                    "login is enabled but session_secret is not set. \
                     Set it in config.toml or via NOTICEBOARD_SESSION_SECRET."
                        .to_string(),
                ));
            }
            if self.web.session_secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(NoticeBoardError::Validation(format!(
                    "session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
                )));
            }
        }
        if self.web.session_max_age_secs == 0 {
            return Err(NoticeBoardError::Validation(
                "session_max_age_secs must be greater than zero".to_string(),
            ));
        }
        if self.web.session_max_age_secs > MAX_SESSION_MAX_AGE_SECS {
            return Err(NoticeBoardError::Validation(format!(
                "session_max_age_secs must be at most {MAX_SESSION_MAX_AGE_SECS}"
            )));
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .parse()
        .map_err(|_| NoticeBoardError::Config(format!("{key}: invalid port '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NoticeBoardError::Config(format!(
            "{key}: invalid boolean '{value}'"
        ))),
    }
}
