//! # Memestream
//!
//! An image-only meme feed with infinite scroll that never dead-ends.
//!
//! ## Architecture
//!
//! ```text
//! Source → Retry → Aggregator → Delivery → HTTP
//! ```
//!
//! - [`source`]: Upstream listing client and its retry policy
//! - [`feed`]: Cursor rotation, image filtering and fallback synthesis
//! - [`server`]: Per-request time budget and the axum routes
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the service
//! memestream serve --bind 127.0.0.1:3000
//!
//! # Fetch a page from the command line
//! memestream feed --after cycle-1-0
//!
//! # Caption a template
//! memestream caption --template 181913649 "writing tests" "running them"
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the source
/// client, the feed aggregator and the caption client.
pub mod app;

/// Caption generation through imgflip.
pub mod caption;

/// Command-line interface using clap.
///
/// - `serve [--bind ADDR]` - Run the HTTP service
/// - `feed [--after CURSOR]` - Print one page as JSON
/// - `caption --template ID TEXT...` - Caption a template
/// - `positions ID` - Suggest text positions
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/memestream/config.toml`, creating a commented
/// default on first run.
pub mod config;

/// Core domain models.
///
/// - [`FeedItem`](domain::FeedItem): One image post
/// - [`Page`](domain::Page): Items plus the opaque `after` cursor
pub mod domain;

/// Feed aggregation.
///
/// - [`FeedAggregator`](feed::FeedAggregator): Produces the next page for a cursor
/// - [`ImageFilter`](feed::ImageFilter): Static image URL acceptance
/// - [`FallbackSynthesizer`](feed::FallbackSynthesizer): Placeholder batches
pub mod feed;

/// HTTP service and the per-request delivery budget.
pub mod server;

/// Upstream listing source.
///
/// - [`SourceClient`](source::SourceClient): Async trait for one listing fetch
/// - [`RedditClient`](source::reddit::RedditClient): reqwest-based implementation
/// - [`RetryPolicy`](source::retry::RetryPolicy): Bounded attempts with backoff
pub mod source;

/// Text box position suggestions for caption templates.
pub mod templates;
