use chrono::NaiveDate;
use serde::Serialize;

/// Counters for one push run, emitted as the JSON result.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PushSummary {
    pub date: Option<NaiveDate>,
    pub dry_run: bool,
    pub fetched: usize,
    pub today: usize,
    /// Detailed plus digest-buffered; excluded entries are not counted.
    pub processed: usize,
    pub detailed: usize,
    pub keyword_upgrades: usize,
    pub digest_buffered: usize,
    pub excluded: usize,
    pub digest_messages: usize,
    /// Messages a real sink accepted.
    pub sent: usize,
    /// Messages dropped by a dry-run or credential-less sink.
    pub discarded: usize,
    pub failed: usize,
}

