// src/config.rs

use std::{env, time::Duration};
use dotenvy::dotenv;
use url::Url;

use crate::services::cache;

/// Fixed decoding parameters sent with every chat-completion request.
pub const TEMPERATURE: f64 = 0.3;
pub const TOP_P: f64 = 1.0;
pub const FREQUENCY_PENALTY: f64 = 0.0;
pub const PRESENCE_PENALTY: f64 = 0.0;
pub const MAX_TOKENS: u32 = 2000;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the completion API. Absence only makes generation fail.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub rust_log: String,
    pub port: u16,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    pub cache_generations: bool,
    /// Entries kept by each memo cache (PDF text, completions).
    pub cache_capacity: usize,
    /// Sessions untouched for this long are evicted.
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|raw| Url::parse(raw).is_ok())
            .map(|raw| raw.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let openai_model = env::var("OPENAI_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string());

        let max_upload_mb: usize = env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let cache_generations = env::var("CACHE_GENERATIONS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let cache_capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(cache::DEFAULT_CAPACITY);

        let session_ttl_minutes: u64 = env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &u64| n > 0)
            .unwrap_or(60);

        let sweep_secs: u64 = env::var("SESSION_SWEEP_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &u64| n > 0)
            .unwrap_or(60);

        Self {
            openai_api_key,
            openai_base_url,
            openai_model,
            rust_log,
            port,
            static_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            cache_generations,
            cache_capacity,
            session_ttl: Duration::from_secs(session_ttl_minutes * 60),
            session_sweep_interval: Duration::from_secs(sweep_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            rust_log: "info".to_string(),
            port: 3000,
            static_dir: "static".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            cache_generations: true,
            cache_capacity: cache::DEFAULT_CAPACITY,
            session_ttl: Duration::from_secs(60 * 60),
            session_sweep_interval: Duration::from_secs(60),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
