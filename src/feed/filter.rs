use url::Url;

use crate::config::FeedConfig;
use crate::domain::FeedItem;

/// Keeps only posts that point at a static image.
#[derive(Debug, Clone)]
pub struct ImageFilter {
    extensions: Vec<String>,
    hosts: Vec<String>,
}

impl ImageFilter {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            extensions: config
                .image_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            hosts: config.image_hosts.iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    /// True when the URL path ends in a known image extension or the URL
    /// is served by a known image host (or one of its subdomains).
    pub fn accepts(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        let path = parsed.path().to_lowercase();
        if self.extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
            return true;
        }

        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.hosts
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
    }

    pub fn retain(&self, items: Vec<FeedItem>) -> Vec<FeedItem> {
        items
            .into_iter()
            .filter(|item| self.accepts(&item.url))
            .collect()
    }
}
