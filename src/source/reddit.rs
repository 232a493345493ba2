use async_trait::async_trait;
use html_escape::decode_html_entities;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::app::Result;
use crate::config::SourceConfig;
use crate::domain::FeedItem;
use crate::source::{Listing, SourceClient, SourceOutcome, SourceRequest};

/// Source client for the `/r/<category>/top/.json` listing API.
pub struct RedditClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl RedditClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    fn listing_url(&self, request: &SourceRequest<'_>) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/r/{}/top/.json",
            self.base_url, request.category
        ))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("t", request.window);
            query.append_pair("limit", &self.page_size.to_string());
            if let Some(after) = request.after {
                query.append_pair("after", after);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl SourceClient for RedditClient {
    async fn fetch(&self, request: &SourceRequest<'_>) -> SourceOutcome {
        let url = match self.listing_url(request) {
            Ok(url) => url,
            Err(e) => return SourceOutcome::TransientError(e.to_string()),
        };

        debug!(category = request.category, window = request.window, %url, "requesting listing");

        // The per-request timeout covers connect, headers and body.
        let response = match self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(request.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return SourceOutcome::TransientError(format!(
                    "timed out after {:?}",
                    request.timeout
                ))
            }
            Err(e) => return SourceOutcome::TransientError(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            warn!("Rate limited or forbidden for r/{} ({})", request.category, status);
            return SourceOutcome::RateLimited;
        }
        if !status.is_success() {
            return SourceOutcome::TransientError(format!("HTTP {}", status));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return SourceOutcome::TransientError(e.to_string()),
        };

        match parse_listing(&body) {
            Ok(listing) if listing.items.is_empty() => SourceOutcome::Empty,
            Ok(listing) => SourceOutcome::Success(listing),
            Err(e) => {
                warn!("Malformed listing from r/{}: {}", request.category, e);
                SourceOutcome::TransientError(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingData {
    after: Option<String>,
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    id: String,
    title: String,
    url: String,
    author: Option<String>,
    ups: Option<u64>,
    num_comments: Option<u64>,
}

/// Decode a listing body into unfiltered feed items.
///
/// Titles and URLs arrive HTML-escaped (`&amp;`) and are decoded here.
pub fn parse_listing(body: &[u8]) -> Result<Listing> {
    let envelope: Envelope = serde_json::from_slice(body)?;

    let items = envelope
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            FeedItem {
                id: post.id,
                title: decode_html_entities(&post.title).to_string(),
                url: decode_html_entities(&post.url).to_string(),
                author: post.author,
                likes: post.ups,
                comments: post.num_comments,
            }
        })
        .collect();

    Ok(Listing {
        items,
        after: envelope.data.after.filter(|a| !a.is_empty()),
    })
}
