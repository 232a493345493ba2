use serde::{Deserialize, Serialize};

use crate::domain::FeedItem;

/// One page of the infinite-scroll feed.
///
/// `next_cursor == None` is the only terminal signal. An empty `items`
/// list with a cursor still means "keep asking".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<FeedItem>,
    #[serde(rename = "after")]
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(items: Vec<FeedItem>, next_cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(next_cursor.into()),
        }
    }

    /// The empty page that tells the client to stop polling.
    pub fn terminal() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_cursor.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_page_shape() {
        let page = Page::terminal();
        assert!(page.is_terminal());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({ "items": [], "after": null }));
    }

    #[test]
    fn test_empty_page_with_cursor_is_not_terminal() {
        let page = Page::new(Vec::new(), "cycle-1-0");
        assert!(!page.is_terminal());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["after"], "cycle-1-0");
    }
}
