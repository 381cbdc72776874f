use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One paper announcement from the feed. Read-only once parsed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeedEntry {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl FeedEntry {
    pub fn published_on(&self, day: NaiveDate) -> bool {
        self.published.map(|ts| ts.date_naive() == day).unwrap_or(false)
    }
}
