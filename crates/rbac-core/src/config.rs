//! Configuration types and loading
//!
//! Layering, lowest precedence first: built-in defaults, an optional
//! `rbac.toml`, `RBAC__SECTION__KEY` environment variables, and finally the
//! conventional variables (`DATABASE_URL`, `HOST`, `PORT`, `JWT_SECRET_KEY`).

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub frontend: FrontendConfig,
    pub table: TableConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API with credentials. Empty means any
    /// origin, without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. Without one the server keeps users in memory.
    pub url: Option<String>,
    pub pool_size: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HS256 secret for token signing
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub token_expiration_minutes: i64,
    /// Name of the cookie carrying the access token
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    pub password_min_length: usize,
    /// Bootstrap administrator created at startup if missing
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    #[default]
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrontendConfig {
    pub enabled: bool,
    /// Directory holding the exported static frontend
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableConfig {
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec![],
            },
            database: DatabaseConfig {
                url: None,
                pool_size: 10,
                connect_timeout_seconds: 5,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_expiration_minutes: 30,
                cookie_name: "access_token".to_string(),
                cookie_secure: true,
                cookie_same_site: SameSite::None,
                password_min_length: 8,
                admin_username: None,
                admin_password: None,
            },
            frontend: FrontendConfig {
                enabled: true,
                static_dir: "rbac/out".to_string(),
            },
            table: TableConfig { page_size: 6 },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file.unwrap_or("rbac")).required(false))
            .add_source(
                config::Environment::with_prefix("RBAC")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the conventional, unprefixed variables through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
        }
        if let Some(secret) = lookup("JWT_SECRET_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(username) = lookup("RBAC_ADMIN_USERNAME") {
            self.auth.admin_username = Some(username);
        }
        if let Some(password) = lookup("RBAC_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.table.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "table.page_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        self.server_addr()?;
        if self.auth.token_expiration_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "auth.token_expiration_minutes".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.auth.cookie_same_site == SameSite::None && !self.auth.cookie_secure {
            tracing::warn!("SameSite=None cookies without Secure are rejected by browsers");
        }
        Ok(())
    }

    /// Token lifetime in seconds
    pub fn token_lifetime_seconds(&self) -> i64 {
        self.auth.token_expiration_minutes * 60
    }

    /// Get the server address. `server.host` must be an IP address.
    pub fn server_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        let host = &self.server.host;
        let ip: std::net::IpAddr = host.parse().map_err(|_| ConfigError::InvalidValue {
            key: "server.host".to_string(),
            message: format!("'{}' is not an IP address", host),
        })?;
        Ok(std::net::SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.cookie_name, "access_token");
        assert_eq!(config.auth.token_expiration_minutes, 30);
        assert_eq!(config.table.page_size, 6);
        assert_eq!(config.token_lifetime_seconds(), 1800);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://rbac@localhost/rbac"),
            ("PORT", "8081"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("RBAC_ADMIN_USERNAME", "root"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database.url.as_deref(), Some("postgres://rbac@localhost/rbac"));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.admin_username.as_deref(), Some("root"));
        assert!(config.auth.admin_password.is_none());
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = AppConfig::default();
        config.table.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig::default();
        assert_eq!(config.server_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_validate_rejects_hostname() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| (k == "HOST").then(|| "localhost".to_string()))
            .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for server.host: 'localhost' is not an IP address"
        );
        assert!(config.server_addr().is_err());
    }

    #[test]
    fn test_same_site_labels() {
        assert_eq!(SameSite::None.as_str(), "None");
        assert_eq!(SameSite::Strict.as_str(), "Strict");
    }
}
