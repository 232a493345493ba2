use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::Page;
use crate::feed::FeedAggregator;

pub const NO_STORE: &str = "no-store";

/// A page plus the `Cache-Control` value it must be served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub page: Page,
    pub cache_control: String,
}

impl Delivery {
    fn terminal() -> Self {
        Self {
            page: Page::terminal(),
            cache_control: NO_STORE.to_string(),
        }
    }
}

/// Race the aggregator against `budget`.
///
/// The aggregator runs on its own task. When the budget runs out the task
/// is aborted, which drops any in-flight upstream request, and the client
/// receives the terminal empty page.
pub async fn deliver(
    aggregator: Arc<FeedAggregator>,
    after: Option<String>,
    budget: Duration,
    cache_directive: &str,
) -> Delivery {
    let after = after.filter(|a| !a.is_empty());
    let continuation = after.is_some();

    let mut task = tokio::spawn(async move { aggregator.next_page(after.as_deref()).await });

    match tokio::time::timeout(budget, &mut task).await {
        Ok(Ok(page)) => {
            info!(
                items = page.items.len(),
                has_after = page.next_cursor.is_some(),
                "Delivered feed page"
            );
            Delivery {
                page,
                cache_control: cache_directive.to_string(),
            }
        }
        Ok(Err(e)) => {
            error!("Feed task failed: {}", e);
            Delivery::terminal()
        }
        Err(_) => {
            task.abort();
            if continuation {
                warn!("Pagination request timed out after {:?}, returning empty result", budget);
            } else {
                warn!("Initial load timed out after {:?}, returning empty result", budget);
            }
            Delivery::terminal()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{FeedConfig, RetryConfig};
    use crate::domain::FeedItem;
    use crate::source::retry::RetryPolicy;
    use crate::source::{Listing, SourceClient, SourceOutcome, SourceRequest};

    const DIRECTIVE: &str = "public, s-maxage=60, stale-while-revalidate=120";

    struct Healthy;

    #[async_trait]
    impl SourceClient for Healthy {
        async fn fetch(&self, _request: &SourceRequest<'_>) -> SourceOutcome {
            SourceOutcome::Success(Listing {
                items: vec![FeedItem::new("a", "A", "https://i.redd.it/a.png")],
                after: Some("t3_a".into()),
            })
        }
    }

    /// Sleeps far past any budget and records whether it ever finished.
    #[derive(Default)]
    struct Stalled {
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl SourceClient for Stalled {
        async fn fetch(&self, _request: &SourceRequest<'_>) -> SourceOutcome {
            tokio::time::sleep(Duration::from_secs(30)).await;
            self.finished.store(true, Ordering::SeqCst);
            SourceOutcome::Empty
        }
    }

    struct Panics;

    #[async_trait]
    impl SourceClient for Panics {
        async fn fetch(&self, _request: &SourceRequest<'_>) -> SourceOutcome {
            panic!("structurally impossible");
        }
    }

    fn aggregator(source: Arc<dyn SourceClient>) -> Arc<FeedAggregator> {
        Arc::new(
            FeedAggregator::new(
                source,
                RetryPolicy::new(RetryConfig::default()),
                &FeedConfig::default(),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_success_is_cacheable() {
        let delivery = deliver(
            aggregator(Arc::new(Healthy)),
            None,
            Duration::from_secs(2),
            DIRECTIVE,
        )
        .await;

        assert_eq!(delivery.cache_control, DIRECTIVE);
        assert_eq!(delivery.page.items.len(), 1);
        assert_eq!(delivery.page.next_cursor.as_deref(), Some("t3_a"));
    }

    #[tokio::test]
    async fn test_timeout_on_continuation_is_terminal() {
        let source = Stalled::default();
        let finished = source.finished.clone();

        let delivery = deliver(
            aggregator(Arc::new(source)),
            Some("cycle-0-0".into()),
            Duration::from_millis(50),
            DIRECTIVE,
        )
        .await;

        assert_eq!(delivery.page, Page::terminal());
        assert_eq!(delivery.cache_control, NO_STORE);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_timeout_on_initial_load_is_terminal() {
        let delivery = deliver(
            aggregator(Arc::new(Stalled::default())),
            Some(String::new()),
            Duration::from_millis(50),
            DIRECTIVE,
        )
        .await;

        assert_eq!(delivery.page, Page::terminal());
        assert_eq!(delivery.cache_control, NO_STORE);
    }

    #[tokio::test]
    async fn test_panicking_aggregator_is_terminal() {
        let delivery = deliver(
            aggregator(Arc::new(Panics)),
            Some("cycle-1-0".into()),
            Duration::from_secs(2),
            DIRECTIVE,
        )
        .await;

        assert!(delivery.page.is_terminal());
        assert_eq!(delivery.cache_control, NO_STORE);
    }
}
