use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every collection path is resolved against, e.g. `https://api.example.com/api/v1`.
    pub api_url: String,
    /// Transport timeout in seconds; `0` leaves requests unbounded.
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub default_page_limit: u32,
    pub search_debounce_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            api_url: env::var("FOLIO_API_URL")?,
            request_timeout_secs: env::var("FOLIO_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            session_file: env::var("FOLIO_SESSION_FILE")
                .unwrap_or_else(|_| ".folio-admin/session.json".to_string())
                .into(),
            default_page_limit: env::var("FOLIO_PAGE_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .map(|l| l.max(1))
                .unwrap_or(10),
            search_debounce_ms: env::var("FOLIO_SEARCH_DEBOUNCE_MS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
        })
    }

    /// Configuration pointing at `api_url` with every other field at its default.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: 30,
            session_file: ".folio-admin/session.json".into(),
            default_page_limit: 10,
            search_debounce_ms: 300,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
