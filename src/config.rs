use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&lookup)?,
        };
        let db = DbConfig {
            url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };
        Ok(Self {
            db,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn compose_database_url<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port: u16 = parse_or(lookup, "DB_PORT", 5432)?;
    let user = lookup("DB_USER").context("DATABASE_URL or DB_USER must be set")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let name = lookup("DB_NAME").context("DATABASE_URL or DB_NAME must be set")?;

    if password.is_empty() {
        Ok(format!("postgres://{}@{}:{}/{}", user, host, port, name))
    } else {
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, password, host, port, name
        ))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
