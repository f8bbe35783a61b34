use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::env;

/// Signing secret used when nothing else is configured. Refused in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "development_secret";

/// Longest token lifetime accepted: one year.
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 525_600;

/// Lowest bcrypt cost accepted outside the test environment.
pub const MIN_BCRYPT_COST: u32 = 12;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_minutes: i64,
    pub bcrypt_cost: u32,
}

/// The fixed credential pair checked by the Basic auth gate.
#[derive(Debug, Deserialize, Clone)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_any_origin: bool,
    pub max_age: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub basic_auth: BasicAuthConfig,
    pub cors: CorsConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let settings: Settings = Self::with_defaults("development")?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_SERVER__PORT=5001` would set `Settings.server.port`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Defaults only, with a cheap bcrypt cost so tests stay fast.
    pub fn new_for_test() -> Result<Self, ConfigError> {
        Self::with_defaults("test")?
            .set_default("server.workers", 1)?
            .set_default("auth.jwt_secret", "test_secret")?
            .set_default("auth.bcrypt_cost", 4)?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("auth.jwt_secret", DEVELOPMENT_JWT_SECRET)?
            .set_default("auth.token_expiry_minutes", 60)?
            .set_default("auth.bcrypt_cost", MIN_BCRYPT_COST as i64)?
            .set_default("basic_auth.username", "user")?
            .set_default("basic_auth.password", "password")?
            .set_default("cors.enabled", true)?
            .set_default("cors.allow_any_origin", false)?
            .set_default("cors.max_age", 3600)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cost = self.auth.bcrypt_cost;
        if cost > 31 || (cost < MIN_BCRYPT_COST && self.environment != "test") {
            return Err(ConfigError::Message(format!(
                "auth.bcrypt_cost must be between {} and 31, got {}",
                MIN_BCRYPT_COST, cost
            )));
        }

        let expiry = self.auth.token_expiry_minutes;
        if expiry <= 0 || expiry > MAX_TOKEN_EXPIRY_MINUTES {
            return Err(ConfigError::Message(format!(
                "auth.token_expiry_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_MINUTES, expiry
            )));
        }

        if self.environment == "production"
            && (self.auth.jwt_secret.is_empty() || self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET)
        {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be configured in production".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::with_defaults("development")?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.workers, 1);
        assert_eq!(settings.auth.token_expiry_minutes, 60);
        assert_eq!(settings.basic_auth.username, "user");
        assert_eq!(settings.basic_auth.password, "password");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_override() {
        let settings = from_toml(
            r#"
            environment = "staging"

            [server]
            port = 9000

            [auth]
            jwt_secret = "override_secret"
            token_expiry_minutes = 15

            [basic_auth]
            username = "admin"
            password = "hunter2"
            "#,
        )
        .expect("Failed to deserialize settings");

        assert_eq!(settings.environment, "staging");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.auth.jwt_secret, "override_secret");
        assert_eq!(settings.auth.token_expiry_minutes, 15);
        assert_eq!(settings.auth.bcrypt_cost, MIN_BCRYPT_COST);
        assert_eq!(settings.basic_auth.username, "admin");
        assert_eq!(settings.basic_auth.password, "hunter2");
    }

    #[test]
    fn test_invalid_port() {
        let result = from_toml("[server]\nport = \"invalid\"\n");
        assert!(result.is_err(), "Expected error for invalid port");
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let settings = from_toml("environment = \"production\"\n").unwrap();
        assert!(settings.validate().is_err());

        let settings = from_toml(
            "environment = \"production\"\n[auth]\njwt_secret = \"a-real-secret\"\n",
        )
        .unwrap();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_low_bcrypt_cost_only_in_test() {
        let settings = from_toml("[auth]\nbcrypt_cost = 4\n").unwrap();
        assert!(settings.validate().is_err());

        let settings = from_toml("environment = \"test\"\n[auth]\nbcrypt_cost = 4\n").unwrap();
        assert!(settings.validate().is_ok());

        let settings = from_toml("[auth]\nbcrypt_cost = 32\n").unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let settings = from_toml("[auth]\ntoken_expiry_minutes = 0\n").unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_expiry_upper_bound() {
        let settings = from_toml(&format!(
            "[auth]\ntoken_expiry_minutes = {}\n",
            MAX_TOKEN_EXPIRY_MINUTES
        ))
        .unwrap();
        assert!(settings.validate().is_ok());

        let settings = from_toml(&format!(
            "[auth]\ntoken_expiry_minutes = {}\n",
            i64::MAX / 60
        ))
        .unwrap();
        assert!(settings.validate().is_err());
    }
}
