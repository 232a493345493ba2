use serde::{Deserialize, Serialize};

use crate::domain::FeedItem;

/// Read-only lists that drive feed rotation, filtering and fallback.
///
/// The aggregator receives this at construction so tests can swap in
/// smaller lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Source categories in priority order. Index 0 is the default.
    pub categories: Vec<String>,

    /// Ranking time windows in rotation order. Index 0 is the default.
    pub windows: Vec<String>,

    /// Cap on the candidate list of continuation requests (default: 2)
    pub continuation_probe: usize,

    /// URL suffixes accepted as static images
    pub image_extensions: Vec<String>,

    /// Hosts whose URLs are accepted regardless of suffix
    pub image_hosts: Vec<String>,

    /// Pre-vetted placeholder posts used when every upstream attempt fails
    pub fallback: Vec<FeedItem>,

    /// Fixed seed for fallback jitter. Unset means OS entropy.
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            categories: [
                "memes",
                "dankmemes",
                "wholesomememes",
                "me_irl",
                "funny",
                "ProgrammerHumor",
                "memeeconomy",
                "AdviceAnimals",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            windows: ["day", "week", "month", "year"]
                .into_iter()
                .map(String::from)
                .collect(),
            continuation_probe: 2,
            image_extensions: [".jpg", ".jpeg", ".png", ".gif"]
                .into_iter()
                .map(String::from)
                .collect(),
            image_hosts: ["imgur.com", "i.redd.it"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback: default_fallback_pool(),
            seed: None,
        }
    }
}

fn placeholder(n: u32, url: &str, likes: u64, comments: u64) -> FeedItem {
    FeedItem {
        id: format!("sample{}", n),
        title: format!("Example Meme {}", n),
        url: url.to_string(),
        author: Some(format!("user{}", n)),
        likes: Some(likes),
        comments: Some(comments),
    }
}

fn default_fallback_pool() -> Vec<FeedItem> {
    vec![
        placeholder(1, "https://i.imgur.com/3vLnXve.png", 1200, 45),
        placeholder(2, "https://i.imgur.com/2ZyFfWO.png", 980, 32),
        placeholder(3, "https://i.imgur.com/5vLnXve.png", 750, 28),
        placeholder(4, "https://i.imgur.com/8ZyFfWO.png", 650, 19),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let config = FeedConfig::default();
        assert_eq!(config.categories.len(), 8);
        assert_eq!(config.categories[0], "memes");
        assert_eq!(config.windows, vec!["day", "week", "month", "year"]);
        assert_eq!(config.continuation_probe, 2);
        assert_eq!(config.fallback.len(), 4);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_fallback_pool_ids_are_distinct() {
        let pool = default_fallback_pool();
        let mut ids: Vec<_> = pool.iter().map(|item| item.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), pool.len());
    }
}
