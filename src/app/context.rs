use std::sync::Arc;

use crate::app::error::Result;
use crate::caption::ImgflipClient;
use crate::config::Config;
use crate::feed::FeedAggregator;
use crate::source::reddit::RedditClient;
use crate::source::retry::RetryPolicy;
use crate::source::SourceClient;

/// Wires the feed pipeline and the captioning client from one [`Config`].
pub struct AppContext {
    pub config: Config,
    pub aggregator: Arc<FeedAggregator>,
    pub captioner: Arc<ImgflipClient>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let source: Arc<dyn SourceClient> = Arc::new(RedditClient::new(&config.source)?);
        Self::with_source(config, source)
    }

    /// Build the context around a caller-supplied source client.
    pub fn with_source(config: Config, source: Arc<dyn SourceClient>) -> Result<Self> {
        config.validate()?;

        let retry = RetryPolicy::new(config.retry.clone());
        let aggregator = Arc::new(FeedAggregator::new(source, retry, &config.feed)?);
        let captioner = Arc::new(ImgflipClient::new(&config.caption)?);

        Ok(Self {
            config,
            aggregator,
            captioner,
        })
    }
}
