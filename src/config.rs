use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Base URL of the remote portal API, including its `/api` prefix
    pub portal_api_base_url: String,

    // Session persistence
    pub session_dir: PathBuf,
    pub session_ttl_hours: i64,

    // Rate limiting, 0 disables
    pub rate_otp_per_min: u32,

    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            portal_api_base_url: "http://localhost:5000/api".to_string(),
            session_dir: PathBuf::from(".session"),
            session_ttl_hours: 24,
            rate_otp_per_min: 5,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            portal_api_base_url: env::var("PORTAL_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.portal_api_base_url),
            session_dir: env::var("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
            rate_otp_per_min: parse_var("RATE_OTP_PER_MIN", defaults.rate_otp_per_min)?,
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{name} has an invalid value: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_one_day_session() {
        let config = Config::default();
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn parse_value_reports_the_variable_name() {
        let err = parse_value::<i64>("SESSION_TTL_HOURS", "a day").unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_HOURS"));

        let level: tracing::Level = parse_value("LOG_LEVEL", " info ").unwrap();
        assert_eq!(level, tracing::Level::INFO);
    }
}
