use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DOMAIN: &str = "mydomain.io";
pub const DEFAULT_LOCAL_ALIAS: &str = "localhost:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

/// Primary domain and its local development alias.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub domain: String,
    pub local_alias: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub database: Database,
    pub site: Site,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_overrides(env::var("DOMAIN").ok(), env::var("DATABASE_URL").ok())
    }

    /// Builds settings from defaults, config files and `APP__` variables, then
    /// applies the `DOMAIN` and `DATABASE_URL` values on top.
    pub fn with_overrides(
        domain: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("http.bind_addr", "0.0.0.0")?
            .set_default("http.port", 3000)?
            .set_default("database.url", "postgres://localhost/sitehost")?
            .set_default("database.max_connections", 5)?
            .set_default("site.domain", DEFAULT_DOMAIN)?
            .set_default("site.local_alias", DEFAULT_LOCAL_ALIAS)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_override_option("site.domain", domain.filter(|d| !d.is_empty()))?
            .set_override_option("database.url", database_url)?
            .build()?
            .try_deserialize()
    }
}
