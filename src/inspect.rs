use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::config::{Credentials, Settings};
use crate::telemetry::{self};
use crate::telemetry::ops::settings::Phase as SettingsPhase;

/// arxiv-push config (plan-only; nothing is fetched or sent)
#[derive(Args, Debug)]
pub struct ConfigCmd {}

#[derive(Serialize)]
struct ConfigPlan<'a> {
    path: String,
    settings: &'a Settings,
    merged_categories: Vec<String>,
    feed_url: Option<String>,
    delivery_enabled: bool,
}

/// entry point for `config`
pub async fn run(config_path: &Path, _args: ConfigCmd) -> Result<()> {
    let log = telemetry::settings();
    let _g = log.root_span_kv([("config", config_path.display().to_string())]).entered();

    let settings = {
        let _s = log.span(&SettingsPhase::Load).entered();
        Settings::load(config_path)?
    };
    let creds = Credentials::from_env();

    let _s = log.span(&SettingsPhase::Show).entered();
    let plan = plan_for(config_path, &settings, &creds);

    log.info(format!("⚙️  Config {}:", plan.path));
    log.info(format!("  Detailed: {}", join_or_dash(&settings.detailed_categories)));
    log.info(format!("  Digest: {}", join_or_dash(&settings.digest_categories)));
    log.info(format!("  Keywords: {}", join_or_dash(&settings.keywords)));
    log.info(format!("  Summary length: {}", settings.summary_length));
    log.info(format!("  Digest max length: {}", settings.digest_max_length));
    log.info(format!("  Send delay: {}ms", settings.send_delay_ms));
    match &plan.feed_url {
        Some(url) => log.info(format!("  Feed: {url}")),
        None => log.warn("  Feed: none (no categories configured)"),
    }
    log.info(format!("  Delivery: {}", if plan.delivery_enabled { "enabled" } else { "disabled (TG_BOT_TOKEN/TG_CHAT_ID unset)" }));

    log.plan(&plan)?;
    Ok(())
}

fn plan_for<'a>(path: &Path, settings: &'a Settings, creds: &Credentials) -> ConfigPlan<'a> {
    ConfigPlan {
        path: path.display().to_string(),
        settings,
        merged_categories: settings.merged_categories(),
        feed_url: settings.has_categories().then(|| settings.feed_url()),
        delivery_enabled: creds.is_complete(),
    }
}

fn join_or_dash(xs: &[String]) -> String {
    if xs.is_empty() { "-".to_string() } else { xs.join(", ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_never_includes_token() {
        let settings = Settings::from_json_str(r#"{"detailed_categories": ["cs.AI"], "keywords": ["llm"]}"#).unwrap();
        let creds = Credentials { bot_token: Some("super-secret".into()), chat_id: Some("1".into()) };
        let plan = plan_for(Path::new("config.json"), &settings, &creds);
        let v = serde_json::to_value(&plan).unwrap();

        assert_eq!(v["feed_url"], "http://export.arxiv.org/rss/cs.AI");
        assert_eq!(v["delivery_enabled"], true);
        assert_eq!(v["settings"]["keywords"][0], "llm");
        assert!(v["settings"].get("categories").is_none());
        assert!(!v.to_string().contains("super-secret"));
    }

    #[test]
    fn no_categories_means_no_feed_url() {
        let settings = Settings::from_json_str("{}").unwrap();
        let plan = plan_for(Path::new("config.json"), &settings, &Credentials::default());
        assert!(plan.feed_url.is_none());
        assert!(!plan.delivery_enabled);
        assert_eq!(join_or_dash(&settings.keywords), "-");
    }
}
