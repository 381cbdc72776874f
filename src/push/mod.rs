mod driver;
pub mod types;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use reqwest::Client;

use crate::config::{Credentials, Settings};
use crate::delivery::{DiscardSink, MessageSink, Pacer, TelegramConfig, TelegramSink};
use crate::feed::{parse_entries, FeedSource, FileFeedSource, RssFeedSource};
use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::push::Phase as PushPhase;
use crate::util::time::resolve_day_opt;

pub use driver::drive;

/// arxiv-push push
#[derive(Args, Debug)]
pub struct PushCmd {
    /// Format and log everything, send nothing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Day to deliver (YYYY-MM-DD, RFC3339, or Nd for N days ago); defaults to today (UTC)
    #[arg(long)]
    pub date: Option<String>,
    /// Read the RSS XML from a file instead of fetching it
    #[arg(long)]
    pub feed_file: Option<PathBuf>,
}

pub async fn run(config_path: &Path, args: PushCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::push();
    let _g = log.root_span_kv([
        ("config", config_path.display().to_string()),
        ("dry_run", args.dry_run.to_string()),
        ("date", format!("{:?}", args.date)),
        ("feed_file", format!("{:?}", args.feed_file)),
    ]).entered();

    let settings = {
        let _s = log.span(&PushPhase::Load).entered();
        Settings::load(config_path)?
    };
    if !settings.has_categories() {
        log.info("ℹ️  detailed_categories and digest_categories are both empty; nothing to do");
        return Ok(());
    }
    let today = resolve_day_opt(&args.date, Utc::now())?;

    let source: Box<dyn FeedSource> = match &args.feed_file {
        Some(path) => Box::new(FileFeedSource::new(path.clone())),
        None => {
            let client = Client::builder()
                .timeout(settings.http_timeout())
                .build()
                .context("build HTTP client")?;
            Box::new(RssFeedSource::new(client, settings.feed_url()))
        }
    };

    log.info(format!("📡 Fetching feed — categories={} source={}", settings.merged_categories().len(), source.describe()));
    let xml = {
        let _s = log.span_kv(&PushPhase::Fetch, [("source", source.describe())]).entered();
        source.fetch().await.with_context(|| format!("fetch feed {}", source.describe()))?
    };
    let entries = {
        let _s = log.span_kv(&PushPhase::Parse, [("bytes", xml.len().to_string())]).entered();
        parse_entries(&xml).with_context(|| format!("parse feed {}", source.describe()))?
    };
    log.info(format!("📥 Fetched {} entries", entries.len()));

    let sink = build_sink(&settings, &Credentials::from_env(), args.dry_run)?;
    let mut summary = drive(&settings, &entries, today, sink.as_ref(), Pacer::new(settings.send_delay())).await;
    summary.dry_run = args.dry_run;

    log.totals(&summary);
    log.result_meta(&summary, Meta { duration_ms: Some(t0.elapsed().as_millis()) })?;
    Ok(())
}

fn build_sink(settings: &Settings, creds: &Credentials, dry_run: bool) -> Result<Box<dyn MessageSink>> {
    let log = telemetry::push();
    if dry_run {
        log.info("📝 Dry run — messages are formatted but not sent");
        return Ok(Box::new(DiscardSink));
    }
    match (&creds.bot_token, &creds.chat_id) {
        (Some(token), Some(chat_id)) => {
            let cfg = TelegramConfig::new(token.clone(), chat_id.clone(), settings.http_timeout());
            Ok(Box::new(TelegramSink::new(cfg)?))
        }
        _ => {
            log.warn("⚠️  TG_BOT_TOKEN or TG_CHAT_ID not set; messages will be skipped");
            Ok(Box::new(DiscardSink))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_or_missing_credentials_discard() {
        let settings = Settings::default();
        let full = Credentials { bot_token: Some("1:a".into()), chat_id: Some("42".into()) };

        assert_eq!(build_sink(&settings, &full, true).unwrap().chat_id(), "");
        assert_eq!(build_sink(&settings, &Credentials::default(), false).unwrap().chat_id(), "");
        assert_eq!(build_sink(&settings, &full, false).unwrap().chat_id(), "42");
    }

    fn write_temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("arxiv-push-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn no_categories_returns_ok_before_fetching() {
        let path = write_temp_config("{}");
        // the feed file does not exist, so reaching the fetch would fail
        let args = PushCmd { dry_run: false, date: None, feed_file: Some(PathBuf::from("/nonexistent.xml")) };
        let res = run(&path, args).await;
        std::fs::remove_file(&path).ok();
        assert!(res.is_ok(), "{res:?}");
    }

    #[tokio::test]
    async fn unreadable_feed_file_is_an_error() {
        let path = write_temp_config(r#"{"detailed_categories": ["cs.AI"]}"#);
        let args = PushCmd { dry_run: true, date: None, feed_file: Some(PathBuf::from("/nonexistent.xml")) };
        let res = run(&path, args).await;
        std::fs::remove_file(&path).ok();
        assert!(format!("{:#}", res.unwrap_err()).contains("read feed file"));
    }

    #[tokio::test]
    async fn missing_config_is_an_error() {
        let args = PushCmd { dry_run: true, date: None, feed_file: None };
        let err = run(Path::new("/nonexistent/arxiv-push.json"), args).await.unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
