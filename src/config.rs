use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Forces the in-memory persistence backend, skipping the database entirely.
    pub use_mock_db: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// How long startup waits for the first connection before falling back to mock
    pub connect_timeout_secs: u64,
}

const DEFAULT_PORT: u16 = 8000;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{DEFAULT_PORT}"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "postgres".to_string(),
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_mock_db = lookup("USE_MOCK_DB")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let port: u16 = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| format!("0.0.0.0:{port}"));

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "DB_PORT")?.unwrap_or(defaults.port),
            username: lookup("DB_USERNAME").unwrap_or(defaults.username),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            database: lookup("DB_DATABASE").unwrap_or(defaults.database),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            connect_timeout_secs: parse_var(&lookup, "DB_CONNECT_TIMEOUT")?
                .unwrap_or(defaults.connect_timeout_secs),
        };

        let config = Config {
            database,
            server: ServerConfig { bind_address },
            use_mock_db,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if !self.use_mock_db && self.database.url.is_none() && self.database.host.is_empty() {
            return Err(ConfigError::ValidationError(
                "DB_HOST or DATABASE_URL is required unless USE_MOCK_DB is set".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("{key} has an invalid value: '{raw}'"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert!(!config.use_mock_db);
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.url, None);
    }

    #[test]
    fn mock_flag_accepts_true_and_one() {
        assert!(load(&[("USE_MOCK_DB", "true")]).unwrap().use_mock_db);
        assert!(load(&[("USE_MOCK_DB", "1")]).unwrap().use_mock_db);
        assert!(!load(&[("USE_MOCK_DB", "no")]).unwrap().use_mock_db);
    }

    #[test]
    fn port_builds_bind_address() {
        let config = load(&[("PORT", "9001")]).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:9001");
    }

    #[test]
    fn bind_address_overrides_port() {
        let config = load(&[("PORT", "9001"), ("BIND_ADDRESS", "127.0.0.1:7000")]).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        assert!(load(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn blank_database_url_is_ignored() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database.url, None);
    }
}
