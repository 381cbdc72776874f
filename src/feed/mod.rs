use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

mod fetch;
mod parse;
pub mod types;

pub use types::FeedEntry;

/// Anything that can hand the pipeline the raw RSS document for this run.
#[async_trait]
pub trait FeedSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Bytes>;
}

/// Parse an RSS document into entries, in feed order.
pub fn parse_entries(xml: &[u8]) -> Result<Vec<FeedEntry>> {
    let channel = parse::parse_channel(xml)?;
    Ok(parse::entries(&channel))
}

/// Live RSS endpoint, one GET per run.
pub struct RssFeedSource {
    client: Client,
    url: String,
}

impl RssFeedSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn describe(&self) -> String { self.url.clone() }

    async fn fetch(&self) -> Result<Bytes> {
        fetch::fetch_rss(&self.client, &self.url).await
    }
}

/// RSS XML saved on disk, for replaying a previous day's feed.
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: PathBuf) -> Self { Self { path } }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    fn describe(&self) -> String { self.path.display().to_string() }

    async fn fetch(&self) -> Result<Bytes> {
        let xml = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("read feed file {}", self.path.display()))?;
        Ok(Bytes::from(xml))
    }
}
