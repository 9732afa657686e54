use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::common::pagination::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub page_limits: PageLimits,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let default_page_size = parse_or("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_page_size = parse_or("MAX_PAGE_SIZE", MAX_PAGE_SIZE)?;
        let page_limits = PageLimits::new(default_page_size, max_page_size)
            .context("DEFAULT_PAGE_SIZE and MAX_PAGE_SIZE must satisfy 1 <= default <= max")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8080)?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            page_limits,
            allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok().as_deref()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
