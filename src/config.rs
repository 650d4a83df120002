use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LIST_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub top_count: usize,
    pub recent_count: usize,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            top_count: DEFAULT_LIST_COUNT,
            recent_count: DEFAULT_LIST_COUNT,
            log_dir: None,
        }
    }
}

impl Config {
    /// Reads `.env.local` and `.env` (first value wins), then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key).and_then(|val| {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let api_base_url = opt("CRICKET_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let timeout_secs = opt("CRICKET_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let top_count = opt("CRICKET_TOP_COUNT")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIST_COUNT)
            .clamp(1, 50);
        let recent_count = opt("CRICKET_RECENT_COUNT")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIST_COUNT)
            .clamp(1, 50);

        Self {
            api_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
            top_count,
            recent_count,
            log_dir: opt("CRICKET_LOG_DIR").map(PathBuf::from),
        }
    }
}
