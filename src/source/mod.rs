//! Upstream content sources.
//!
//! A [`SourceClient`] performs exactly one bounded request and classifies
//! the result. Retrying is layered on top by [`retry::RetryPolicy`].

pub mod reddit;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::FeedItem;

/// One request against a category/window combination.
#[derive(Debug, Clone, Copy)]
pub struct SourceRequest<'a> {
    pub category: &'a str,
    pub window: &'a str,
    /// Native continuation token of the upstream source
    pub after: Option<&'a str>,
    pub timeout: Duration,
}

/// Decoded upstream payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Candidate posts in upstream rank order, not yet filtered
    pub items: Vec<FeedItem>,
    /// Native token for the next upstream page, if any
    pub after: Option<String>,
}

/// Classified result of a single source request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Success(Listing),
    /// HTTP 429 or 403. The category must not be retried.
    RateLimited,
    /// Well-formed response with no entries
    Empty,
    /// Timeout, network failure, malformed body or any other non-2xx
    TransientError(String),
}

#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn fetch(&self, request: &SourceRequest<'_>) -> SourceOutcome;
}
