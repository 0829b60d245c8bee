use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// MongoDB connection string, or `memory://` for the in-process store
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_database_name")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Required, no default
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Put the employee routes behind bearer-token validation
    #[serde(default)]
    pub protect_employee_routes: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            name: default_database_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_database_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "hrkit".to_string()
}

fn default_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Environment variables that map onto configuration keys, used to report overrides
const ENV_OVERRIDES: [(&str, &str); 11] = [
    ("HRKIT_DATABASE__URL", "database.url"),
    ("HRKIT_DATABASE__NAME", "database.name"),
    ("HRKIT_AUTH__JWT_SECRET", "auth.jwt_secret"),
    ("HRKIT_AUTH__TOKEN_EXPIRY_SECONDS", "auth.token_expiry_seconds"),
    ("HRKIT_AUTH__BCRYPT_COST", "auth.bcrypt_cost"),
    ("HRKIT_AUTH__PROTECT_EMPLOYEE_ROUTES", "auth.protect_employee_routes"),
    ("HRKIT_SERVER__HOST", "server.host"),
    ("HRKIT_SERVER__PORT", "server.port"),
    ("HRKIT_LOG__LEVEL", "log.level"),
    ("HRKIT_LOG__JSON", "log.json"),
    ("PORT", "server.port"),
];

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from hrkit.toml in the current directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file("hrkit.toml")
    }

    /// Load configuration with environment variable overrides
    ///
    /// Environment variables are prefixed with HRKIT_ and use `__` between
    /// sections, e.g. HRKIT_DATABASE__URL, HRKIT_AUTH__JWT_SECRET. A plain
    /// PORT variable overrides server.port.
    ///
    /// Returns the config and the list of keys taken from the environment
    pub fn load_with_env() -> Result<(Self, Vec<String>), ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("hrkit").required(false))
            .add_source(
                Environment::with_prefix("HRKIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        let overrides = ENV_OVERRIDES
            .iter()
            .filter(|(env_var, _)| std::env::var(env_var).is_ok())
            .map(|(_, key)| key.to_string())
            .collect();

        let app_config = config.try_deserialize::<Self>()?.validated()?;
        Ok((app_config, overrides))
    }

    /// Reject values that deserialize but cannot be used
    fn validated(self) -> Result<Self, ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".to_string()));
        }
        Ok(self)
    }
}
