//! Feed pagination and fallback.
//!
//! [`FeedAggregator::next_page`] decodes the incoming cursor, walks the
//! candidate categories in priority order through the retry policy, and
//! always answers with a [`Page`] that carries a usable cursor. It is the
//! only place that builds or parses cursors and the only place that
//! decides to synthesize fallback posts.

mod cursor;
pub mod fallback;
pub mod filter;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, FeedConfig};
use crate::domain::Page;
use crate::source::retry::{RetryOutcome, RetryPolicy};
use crate::source::SourceClient;

use cursor::CursorCodec;
pub use fallback::{FallbackKind, FallbackSynthesizer};
pub use filter::ImageFilter;

pub struct FeedAggregator {
    source: Arc<dyn SourceClient>,
    retry: RetryPolicy,
    categories: Vec<String>,
    windows: Vec<String>,
    continuation_probe: usize,
    codec: CursorCodec,
    filter: ImageFilter,
    fallback: FallbackSynthesizer,
}

impl FeedAggregator {
    pub fn new(
        source: Arc<dyn SourceClient>,
        retry: RetryPolicy,
        config: &FeedConfig,
    ) -> Result<Self, ConfigError> {
        if config.categories.is_empty() || config.windows.is_empty() {
            return Err(ConfigError::Invalid(
                "feed needs at least one category and one window".into(),
            ));
        }

        Ok(Self {
            source,
            retry,
            categories: config.categories.clone(),
            windows: config.windows.clone(),
            continuation_probe: config.continuation_probe,
            codec: CursorCodec::new(config.categories.len(), config.windows.len()),
            filter: ImageFilter::new(config),
            fallback: FallbackSynthesizer::new(config.fallback.clone(), config.seed),
        })
    }

    /// Replace the fallback synthesizer, e.g. with a fixed sequence start.
    pub fn with_fallback(mut self, fallback: FallbackSynthesizer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Produce the page that follows `raw_cursor`. Never fails.
    pub async fn next_page(&self, raw_cursor: Option<&str>) -> Page {
        let raw_cursor = raw_cursor.filter(|c| !c.is_empty());
        let initial = raw_cursor.is_none();
        let position = self.codec.decode(raw_cursor);
        let window = self.windows[position.window].as_str();
        let candidates = self.candidates(position.category, initial);

        for (rank, &category_index) in candidates.iter().enumerate() {
            let category = self.categories[category_index].as_str();
            // Only the preferred category continues its own native pagination.
            let token = if rank == 0 {
                position.native.as_deref()
            } else {
                None
            };

            let kind = match self
                .retry
                .fetch(self.source.as_ref(), category, window, token)
                .await
            {
                RetryOutcome::Fetched(listing) => {
                    let fetched = listing.items.len();
                    let items = self.filter.retain(listing.items);
                    if !items.is_empty() {
                        info!(
                            "Fetched {} posts from r/{}{}",
                            items.len(),
                            category,
                            if initial { "" } else { " (pagination)" }
                        );
                        let next = self.codec.encode(
                            category_index,
                            position.window,
                            listing.after.as_deref(),
                        );
                        return Page::new(items, next);
                    }
                    debug!("All {} posts from r/{} were filtered out", fetched, category);
                    FallbackKind::Filtered
                }
                RetryOutcome::Empty => {
                    warn!("No posts found in r/{}", category);
                    FallbackKind::NoPosts
                }
                RetryOutcome::RateLimited | RetryOutcome::Exhausted => FallbackKind::Unreachable,
            };

            // A continuation gives up on its first candidate.
            if !initial {
                return self.fallback_page(raw_cursor, category_index, position.window, kind);
            }
        }

        warn!("All category attempts failed, using fallback posts");
        Page::new(
            self.fallback.pool().to_vec(),
            self.codec.advance(position.category, position.window),
        )
    }

    /// Preferred category first. Initial loads then try every other
    /// category in list order. Continuations are capped at the first
    /// `continuation_probe` categories, and `next_page` falls back as soon
    /// as the preferred one fails.
    fn candidates(&self, preferred: usize, initial: bool) -> Vec<usize> {
        let limit = if initial {
            self.categories.len()
        } else {
            self.continuation_probe.min(self.categories.len())
        };

        std::iter::once(preferred)
            .chain((0..limit).filter(|&i| i != preferred))
            .collect()
    }

    fn fallback_page(
        &self,
        raw_cursor: Option<&str>,
        category_index: usize,
        window_index: usize,
        kind: FallbackKind,
    ) -> Page {
        let category = &self.categories[category_index];
        warn!("Pagination fell back for r/{} ({:?}), generating mixed content", category, kind);
        let items = self
            .fallback
            .synthesize(raw_cursor.unwrap_or_default(), category, kind);
        Page::new(items, self.codec.advance(category_index, window_index))
    }
}
