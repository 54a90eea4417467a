use std::env;
use std::path::PathBuf;

const DEFAULT_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint returning the provider's model listing.
    pub models_url: String,
    /// Directory the JSON file store writes under.
    pub data_dir: PathBuf,
    /// Client-level timeout for the model fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Default page size for table queries.
    pub rows_per_page: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file (ignore if missing)
        dotenvy::dotenv().ok();

        Ok(Self {
            models_url: env::var("MODELS_API_URL").unwrap_or_else(|_| DEFAULT_MODELS_URL.into()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".modelboard")),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rows_per_page: env::var("ROWS_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(10),
        })
    }
}
