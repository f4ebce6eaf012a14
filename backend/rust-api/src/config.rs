use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    /// Bound on any single durable-store call (append, count, ping).
    pub store_timeout_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    panic!("FATAL: MONGO_URI must be set in production!");
                }
                eprintln!("WARNING: MONGO_URI not set, using localhost (dev mode only!)");
                "mongodb://localhost:27017".to_string()
            });

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "gauntlet".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let store_timeout_ms = settings
            .get_int("database.store_timeout_ms")
            .ok()
            .map(|v| v as u64)
            .or_else(|| {
                env::var("STORE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .filter(|v| *v > 0)
            .unwrap_or(5000);

        Ok(Config {
            mongo_uri,
            mongo_database,
            bind_addr,
            store_timeout_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn load_defaults_without_environment() {
        env::remove_var("MONGO_URI");
        env::remove_var("MONGO_DATABASE");
        env::remove_var("BIND_ADDR");
        env::remove_var("STORE_TIMEOUT_MS");

        let config = Config::load().unwrap();
        assert_eq!(config.mongo_database, "gauntlet");
        assert_eq!(config.bind_addr, "0.0.0.0:8081");
        assert_eq!(config.store_timeout_ms, 5000);
    }

    #[test]
    #[serial]
    fn env_vars_override_defaults() {
        env::set_var("MONGO_URI", "mongodb://db.internal:27017");
        env::set_var("STORE_TIMEOUT_MS", "250");

        let config = Config::load().unwrap();
        assert_eq!(config.mongo_uri, "mongodb://db.internal:27017");
        assert_eq!(config.store_timeout_ms, 250);

        env::remove_var("MONGO_URI");
        env::remove_var("STORE_TIMEOUT_MS");
    }
}
