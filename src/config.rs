//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Full database connection URL, overrides the individual parts below
    pub database_url: Option<String>,

    /// Database user (DBUSER)
    pub database_user: Option<String>,

    /// Database password (DBPASS)
    pub database_password: Option<String>,

    /// Database host
    pub database_host: String,

    /// Database port
    pub database_port: u16,

    /// Database name
    pub database_name: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        let database_user = lookup("DBUSER");
        let database_password = lookup("DBPASS");

        if database_url.is_none() && database_user.is_none() {
            return Err(ConfigError::MissingEnv("DATABASE_URL or DBUSER"));
        }

        let database_host = lookup("DB_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let database_port = lookup("DB_PORT")
            .unwrap_or_else(|| "5432".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DB_PORT"))?;

        let database_name = lookup("DB_NAME").unwrap_or_else(|| "recordings".to_string());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            database_url,
            database_user,
            database_password,
            database_host,
            database_port,
            database_name,
            database_max_connections,
            host,
            port,
            environment,
        })
    }

    /// Build the connection options for the store.
    ///
    /// `DATABASE_URL` wins when present; otherwise the options are assembled
    /// from the credentials and the host/port/name settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.database_url {
            return PgConnectOptions::from_str(url)
                .map_err(|_| ConfigError::InvalidValue("DATABASE_URL"));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.database_host)
            .port(self.database_port)
            .database(&self.database_name);

        if let Some(user) = &self.database_user {
            options = options.username(user);
        }
        if let Some(password) = &self.database_password {
            options = options.password(password);
        }

        Ok(options)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_credentials() {
        let config =
            Config::from_lookup(lookup_from(&[("DBUSER", "shop"), ("DBPASS", "secret")])).unwrap();

        assert_eq!(config.database_host, "127.0.0.1");
        assert_eq!(config.database_port, 5432);
        assert_eq!(config.database_name, "recordings");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingEnv(_))));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/recordings"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue("PORT"))));
    }

    #[test]
    fn test_connect_options_from_parts() {
        let config = Config::from_lookup(lookup_from(&[
            ("DBUSER", "shop"),
            ("DBPASS", "secret"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
        ]))
        .unwrap();

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "shop");
        assert_eq!(options.get_database(), Some("recordings"));
    }

    #[test]
    fn test_connect_options_from_url() {
        let config = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://app:pw@example.org:5433/shop",
        )]))
        .unwrap();

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "example.org");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[test]
    fn test_production_flag() {
        let config = Config::from_lookup(lookup_from(&[
            ("DBUSER", "shop"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert!(config.is_production());
    }
}
