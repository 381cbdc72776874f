use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rss::{Channel, Item};

use super::types::FeedEntry;

pub fn parse_channel(xml: &[u8]) -> Result<Channel> {
    let ch = Channel::read_from(xml).context("parse RSS channel")?;
    Ok(ch)
}

pub fn entries(channel: &Channel) -> Vec<FeedEntry> {
    channel.items().iter().map(to_entry).collect()
}

fn to_entry(item: &Item) -> FeedEntry {
    FeedEntry {
        title: item.title().unwrap_or_default().to_string(),
        author: extract_authors(item),
        summary: item.description().unwrap_or_default().to_string(),
        link: item.link().unwrap_or_default().trim().to_string(),
        published: extract_published_at(item),
        tags: item.categories().iter().map(|c| c.name().trim().to_string()).filter(|t| !t.is_empty()).collect(),
    }
}

fn extract_authors(item: &Item) -> String {
    if let Some(dc) = item.dublin_core_ext() {
        let creators: Vec<&str> = dc.creators().iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
        if !creators.is_empty() { return creators.join(", "); }
    }
    item.author().unwrap_or_default().trim().to_string()
}

pub fn extract_published_at(item: &Item) -> Option<DateTime<Utc>> {
    if let Some(pub_date) = item.pub_date() {
        if let Ok(dt) = DateTime::parse_from_rfc2822(pub_date) { return Some(dt.with_timezone(&Utc)); }
    }
    // Dublin Core date (RFC3339) as a fallback
    if let Some(dc) = item.dublin_core_ext() {
        if let Some(first) = dc.dates().first() {
            if let Ok(dt) = DateTime::parse_from_rfc3339(first) { return Some(dt.with_timezone(&Utc)); }
        }
    }
    None
}
