use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream content source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the content source (default: https://www.reddit.com)
    pub base_url: String,

    /// User agent sent with every source request
    pub user_agent: String,

    /// Posts requested per page (default: 25)
    pub page_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            page_size: 25,
        }
    }
}

/// Retry behaviour for a single source category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per category, including the first (default: 2)
    pub max_attempts: u32,

    /// Timeout of the first attempt in milliseconds (default: 8000)
    pub first_attempt_timeout_ms: u64,

    /// Timeout of every later attempt in milliseconds (default: 5000)
    pub retry_timeout_ms: u64,

    /// Delay before the first retry in milliseconds (default: 300)
    pub base_delay_ms: u64,

    /// Upper bound for the backoff delay in milliseconds (default: 2000)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            first_attempt_timeout_ms: 8000,
            retry_timeout_ms: 5000,
            base_delay_ms: 300,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn first_attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.first_attempt_timeout_ms)
    }

    pub fn retry_timeout(&self) -> Duration {
        Duration::from_millis(self.retry_timeout_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:3000)
    pub bind: String,

    /// Hard budget for one feed request in milliseconds (default: 12000)
    pub request_timeout_ms: u64,

    /// Shared cache lifetime for delivered pages in seconds (default: 60)
    pub cache_max_age_secs: u64,

    /// Grace window for serving stale pages in seconds (default: 120)
    pub stale_while_revalidate_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            request_timeout_ms: 12_000,
            cache_max_age_secs: 60,
            stale_while_revalidate_secs: 120,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `Cache-Control` value for a successfully delivered page
    pub fn cache_directive(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age_secs, self.stale_while_revalidate_secs
        )
    }
}

/// Captioning service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Base URL of the captioning API (default: https://api.imgflip.com)
    pub endpoint: String,

    /// Account name. `IMGFLIP_USERNAME` overrides it.
    pub username: Option<String>,

    /// Account password. `IMGFLIP_PASSWORD` overrides it.
    pub password: Option<String>,

    /// Timeout for a caption request in milliseconds (default: 20000)
    pub timeout_ms: u64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.imgflip.com".to_string(),
            username: None,
            password: None,
            timeout_ms: 20_000,
        }
    }
}

impl CaptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Both halves of the credentials, if configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Replace file credentials with the given environment values when set.
    pub fn apply_env(&mut self, username: Option<String>, password: Option<String>) {
        if let Some(username) = username.filter(|v| !v.is_empty()) {
            self.username = Some(username);
        }
        if let Some(password) = password.filter(|v| !v.is_empty()) {
            self.password = Some(password);
        }
    }
}
