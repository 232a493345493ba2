//! Configuration management for memestream.
//!
//! Configuration is read from `~/.config/memestream/config.toml` at startup
//! unless another path is given. If the default file doesn't exist, a
//! default configuration with comments is created.

pub mod catalog;
pub mod services;

pub use catalog::FeedConfig;
pub use services::{CaptionConfig, RetryConfig, ServerConfig, SourceConfig};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub retry: RetryConfig,
    pub feed: FeedConfig,
    pub server: ServerConfig,
    pub caption: CaptionConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default file is created with comments. A missing explicit
    /// path is an error. Missing fields use default values. Captioning
    /// credentials from the environment override the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    Self::default()
                } else {
                    Self::from_file(&config_path)?
                }
            }
        };

        config.caption.apply_env(
            std::env::var("IMGFLIP_USERNAME").ok(),
            std::env::var("IMGFLIP_PASSWORD").ok(),
        );

        Ok(config)
    }

    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the feed cannot rotate through.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.categories.is_empty() {
            return Err(ConfigError::Invalid("feed.categories must not be empty".into()));
        }
        if self.feed.windows.is_empty() {
            return Err(ConfigError::Invalid("feed.windows must not be empty".into()));
        }
        if self.feed.fallback.is_empty() {
            return Err(ConfigError::Invalid("feed.fallback must hold at least one post".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        let longest_attempt = self
            .retry
            .first_attempt_timeout_ms
            .max(self.retry.retry_timeout_ms);
        if self.server.request_timeout_ms <= longest_attempt {
            return Err(ConfigError::Invalid(format!(
                "server.request_timeout_ms ({}) must exceed the longest retry attempt timeout ({})",
                self.server.request_timeout_ms, longest_attempt
            )));
        }
        Ok(())
    }

    /// Get the default config file path: `~/.config/memestream/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("memestream").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# memestream configuration

[source]
base_url = "https://www.reddit.com"
page_size = 25

[retry]
# Attempts per category, including the first
max_attempts = 2

# The first attempt gets the longer budget
first_attempt_timeout_ms = 8000
retry_timeout_ms = 5000

# Backoff between attempts doubles from base_delay_ms up to max_delay_ms
base_delay_ms = 300
max_delay_ms = 2000

[feed]
# Categories in priority order; the first one is the default
categories = [
    "memes",
    "dankmemes",
    "wholesomememes",
    "me_irl",
    "funny",
    "ProgrammerHumor",
    "memeeconomy",
    "AdviceAnimals",
]

# Ranking windows in rotation order
windows = ["day", "week", "month", "year"]

# Cap on the categories listed for a paginated request
continuation_probe = 2

# A post is kept when its URL ends with one of these or is served from one of these hosts
image_extensions = [".jpg", ".jpeg", ".png", ".gif"]
image_hosts = ["imgur.com", "i.redd.it"]

# Fixed seed for fallback jitter (leave unset in production)
# seed = 7

[[feed.fallback]]
id = "sample1"
title = "Example Meme 1"
url = "https://i.imgur.com/3vLnXve.png"
author = "user1"
likes = 1200
comments = 45

[[feed.fallback]]
id = "sample2"
title = "Example Meme 2"
url = "https://i.imgur.com/2ZyFfWO.png"
author = "user2"
likes = 980
comments = 32

[[feed.fallback]]
id = "sample3"
title = "Example Meme 3"
url = "https://i.imgur.com/5vLnXve.png"
author = "user3"
likes = 750
comments = 28

[[feed.fallback]]
id = "sample4"
title = "Example Meme 4"
url = "https://i.imgur.com/8ZyFfWO.png"
author = "user4"
likes = 650
comments = 19

[server]
bind = "127.0.0.1:3000"

# Hard budget for one feed request
request_timeout_ms = 12000

# Cache-Control for delivered pages
cache_max_age_secs = 60
stale_while_revalidate_secs = 120

[caption]
endpoint = "https://api.imgflip.com"
timeout_ms = 20000
# Prefer IMGFLIP_USERNAME / IMGFLIP_PASSWORD in the environment
# username = ""
# password = ""
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        let defaults = FeedConfig::default();
        assert_eq!(config.feed.categories, defaults.categories);
        assert_eq!(config.feed.windows, defaults.windows);
        assert_eq!(config.feed.fallback, defaults.fallback);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.server.request_timeout_ms, 12_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[feed]
categories = ["pics", "gifs"]
seed = 3
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.feed.categories, vec!["pics", "gifs"]);
        assert_eq!(config.feed.seed, Some(3));
        // Defaults fill the rest
        assert_eq!(config.feed.windows.len(), 4);
        assert_eq!(config.source.page_size, 25);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.feed.categories[0], "memes");
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_from_file_rejects_empty_windows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[feed]\nwindows = []\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file_rejects_request_timeout_within_attempt_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nrequest_timeout_ms = 8000\n\n[retry]\nfirst_attempt_timeout_ms = 8000\n",
        )
        .unwrap();

        match Config::from_file(&path) {
            Err(ConfigError::Invalid(message)) => assert!(message.contains("request_timeout_ms")),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_reports_parse_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\n").unwrap();

        match Config::from_file(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}
