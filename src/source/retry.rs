use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::source::{Listing, SourceClient, SourceOutcome, SourceRequest};

/// What the retry loop settled on for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    Fetched(Listing),
    /// The source answered with no entries. Never retried: the same
    /// token yields the same empty payload.
    Empty,
    /// The category refused service. Never retried.
    RateLimited,
    /// Every attempt failed transiently.
    Exhausted,
}

/// Bounded retries with capped exponential backoff around a [`SourceClient`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Timeout for the given zero-based attempt. A slow first answer is
    /// more likely systemic, so later attempts get less time.
    pub fn attempt_timeout(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            self.config.first_attempt_timeout()
        } else {
            self.config.retry_timeout()
        }
    }

    /// Delay before retry number `retry` (1-based): doubles each time,
    /// capped at `max_delay`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        self.config
            .base_delay()
            .saturating_mul(1u32 << shift)
            .min(self.config.max_delay())
    }

    pub async fn fetch(
        &self,
        source: &dyn SourceClient,
        category: &str,
        window: &str,
        after: Option<&str>,
    ) -> RetryOutcome {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 0..attempts {
            let request = SourceRequest {
                category,
                window,
                after,
                timeout: self.attempt_timeout(attempt),
            };

            match source.fetch(&request).await {
                SourceOutcome::Success(listing) => return RetryOutcome::Fetched(listing),
                SourceOutcome::Empty => {
                    debug!("No posts in r/{} ({})", category, window);
                    return RetryOutcome::Empty;
                }
                SourceOutcome::RateLimited => return RetryOutcome::RateLimited,
                SourceOutcome::TransientError(reason) => {
                    warn!(
                        "Attempt {}/{} failed for r/{}: {}",
                        attempt + 1,
                        attempts,
                        category,
                        reason
                    );
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.backoff_delay(attempt + 1)).await;
                    }
                }
            }
        }

        RetryOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::FeedItem;

    /// Replays scripted outcomes and records the timeout of each call.
    struct Scripted {
        outcomes: Mutex<VecDeque<SourceOutcome>>,
        timeouts: Mutex<Vec<Duration>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<SourceOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                timeouts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Duration> {
            self.timeouts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SourceClient for Scripted {
        async fn fetch(&self, request: &SourceRequest<'_>) -> SourceOutcome {
            self.timeouts.lock().unwrap().push(request.timeout);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| SourceOutcome::TransientError("script ran out".into()))
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            first_attempt_timeout_ms: 80,
            retry_timeout_ms: 50,
            base_delay_ms: 1,
            max_delay_ms: 4,
        })
    }

    fn listing() -> Listing {
        Listing {
            items: vec![FeedItem::new("a", "A", "https://i.redd.it/a.png")],
            after: None,
        }
    }

    #[test]
    fn test_backoff_increases_until_cap() {
        let policy = RetryPolicy::new(RetryConfig::default());
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(300));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(600));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(1200));
        assert_eq!(policy.backoff_delay(4), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(40), Duration::from_millis(2000));
    }

    #[test]
    fn test_first_attempt_gets_longest_timeout() {
        let policy = RetryPolicy::new(RetryConfig::default());
        assert_eq!(policy.attempt_timeout(0), Duration::from_millis(8000));
        assert_eq!(policy.attempt_timeout(1), Duration::from_millis(5000));
        assert_eq!(policy.attempt_timeout(5), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let source = Scripted::new(vec![
            SourceOutcome::TransientError("boom".into()),
            SourceOutcome::Success(listing()),
        ]);
        let outcome = fast_policy(2).fetch(&source, "memes", "day", None).await;
        assert_eq!(outcome, RetryOutcome::Fetched(listing()));
        assert_eq!(
            source.calls(),
            vec![Duration::from_millis(80), Duration::from_millis(50)]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_stops_immediately() {
        let source = Scripted::new(vec![
            SourceOutcome::RateLimited,
            SourceOutcome::Success(listing()),
        ]);
        let outcome = fast_policy(3).fetch(&source, "memes", "day", None).await;
        assert_eq!(outcome, RetryOutcome::RateLimited);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_is_not_retried() {
        let source = Scripted::new(vec![SourceOutcome::Empty, SourceOutcome::Success(listing())]);
        let outcome = fast_policy(3).fetch(&source, "memes", "day", None).await;
        assert_eq!(outcome, RetryOutcome::Empty);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_after_max_attempts() {
        let source = Scripted::new(vec![]);
        let outcome = fast_policy(3).fetch(&source, "memes", "day", None).await;
        assert_eq!(outcome, RetryOutcome::Exhausted);
        assert_eq!(source.calls().len(), 3);
    }
}
