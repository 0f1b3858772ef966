use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Built-in signing secret used when none is configured. Fine for local
/// development, logged as a warning at startup.
pub const DEFAULT_TOKEN_SECRET: &str = "assetr-dev-secret";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: i64,
    /// Restores the legacy behavior of returning every row to a non-admin
    /// caller that supplies no company. Off by default: scoped listings
    /// require a company.
    #[serde(default)]
    pub allow_unscoped_lists: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_expiry_secs: default_token_expiry_secs(),
            allow_unscoped_lists: false,
        }
    }
}

fn default_token_secret() -> String {
    DEFAULT_TOKEN_SECRET.to_string()
}

fn default_token_expiry_secs() -> i64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origin the browser frontend is served from.
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_origin: default_frontend_origin(),
        }
    }
}

fn default_frontend_origin() -> String {
    "http://localhost:5173".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: Option<String>,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_smtp_tls")]
    pub smtp_tls: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: None,
            from_name: default_from_name(),
            smtp_tls: default_smtp_tls(),
        }
    }
}

impl EmailConfig {
    /// Ticket notifications are skipped entirely unless every SMTP
    /// credential is present.
    pub fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
            && self.smtp_username.is_some()
            && self.smtp_password.is_some()
            && self.from_address.is_some()
    }
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Ticket System".to_string()
}

fn default_smtp_tls() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse configuration file")?
        } else {
            info!("No config file found, using defaults");
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Environment variables win over the config file, so secrets never
    /// have to live on disk.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("ASSETR_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ASSETR_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("ASSETR_DATA_DIR") {
            self.server.data_dir = PathBuf::from(dir);
        }
        if let Ok(secret) = std::env::var("ASSETR_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Ok(expiry) = std::env::var("ASSETR_TOKEN_EXPIRY_SECS") {
            if let Ok(expiry) = expiry.parse() {
                self.auth.token_expiry_secs = expiry;
            }
        }
        if let Ok(origin) = std::env::var("ASSETR_FRONTEND_ORIGIN") {
            self.cors.frontend_origin = origin;
        }
        if let Ok(host) = std::env::var("ASSETR_SMTP_HOST") {
            self.email.smtp_host = Some(host);
        }
        if let Ok(port) = std::env::var("ASSETR_SMTP_PORT") {
            if let Ok(port) = port.parse() {
                self.email.smtp_port = port;
            }
        }
        if let Ok(user) = std::env::var("ASSETR_SMTP_USERNAME") {
            self.email.smtp_username = Some(user);
        }
        if let Ok(pass) = std::env::var("ASSETR_SMTP_PASSWORD") {
            self.email.smtp_password = Some(pass);
        }
        if let Ok(from) = std::env::var("ASSETR_SMTP_FROM") {
            self.email.from_address = Some(from);
        }
        if let Ok(level) = std::env::var("ASSETR_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.auth.token_secret, DEFAULT_TOKEN_SECRET);
        assert_eq!(config.auth.token_expiry_secs, 3600);
        assert!(!config.auth.allow_unscoped_lists);
        assert_eq!(config.cors.frontend_origin, "http://localhost:5173");
    }

    #[test]
    fn test_email_unconfigured_by_default() {
        let config = EmailConfig::default();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_email_configured_requires_all_credentials() {
        let config = EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_username: Some("mailer".to_string()),
            smtp_password: Some("hunter2".to_string()),
            from_address: Some("noreply@example.com".to_string()),
            ..EmailConfig::default()
        };
        assert!(config.is_configured());

        let partial = EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            ..EmailConfig::default()
        };
        assert!(!partial.is_configured());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [auth]
            token_expiry_secs = 7200
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.token_expiry_secs, 7200);
        assert_eq!(config.auth.token_secret, DEFAULT_TOKEN_SECRET);
    }
}
