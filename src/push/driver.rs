use chrono::NaiveDate;

use crate::config::Settings;
use crate::delivery::{MessageSink, OutboundMessage, Pacer};
use crate::digest::DigestBuffer;
use crate::feed::FeedEntry;
use crate::render::format_detailed;
use crate::route::{classify, match_keyword, Classification};
use crate::telemetry::{self};
use crate::telemetry::ops::push::Phase as PushPhase;

use super::types::PushSummary;

const LOG_TITLE_CHARS: usize = 30;

/// Single pass over the feed: filter to `today`, route, send, then flush the digest.
pub async fn drive(
    settings: &Settings,
    entries: &[FeedEntry],
    today: NaiveDate,
    sink: &dyn MessageSink,
    pacer: Pacer,
) -> PushSummary {
    let log = telemetry::push();
    let mut summary = PushSummary { date: Some(today), fetched: entries.len(), ..PushSummary::default() };
    let mut buffer = DigestBuffer::new();

    let route_span = log.span(&PushPhase::Route).entered();
    for entry in entries {
        if !entry.published_on(today) {
            log.debug_kv("↩️ skip (not today)", [("title", short_title(&entry.title)), ("published", format!("{:?}", entry.published))]);
            continue;
        }
        summary.today += 1;

        match classify(&entry.tags, &settings.detailed_categories, &settings.digest_categories) {
            Classification::Detailed => {
                log.info_kv(
                    &format!("[{}] 📨 detailed: {}", summary.processed + 1, short_title(&entry.title)),
                    [("title", entry.title.clone()), ("tags", entry.tags.join(","))],
                );
                let text = format_detailed(entry, settings.summary_length, None);
                deliver(sink, text, pacer, &mut summary).await;
                summary.detailed += 1;
            }
            Classification::Digest(category) => {
                // keyword check only runs for digest candidates
                match match_keyword(&entry.title, &entry.summary, &settings.keywords) {
                    Some(keyword) => {
                        log.info_kv(
                            &format!("[{}] 🎯 detailed (keyword {}): {}", summary.processed + 1, keyword, short_title(&entry.title)),
                            [("title", entry.title.clone()), ("keyword", keyword.to_string())],
                        );
                        let text = format_detailed(entry, settings.summary_length, Some(keyword));
                        deliver(sink, text, pacer, &mut summary).await;
                        summary.detailed += 1;
                        summary.keyword_upgrades += 1;
                    }
                    None => {
                        log.info_kv(
                            &format!("[{}] 🗂 digest → {}: {}", summary.processed + 1, category, short_title(&entry.title)),
                            [("title", entry.title.clone()), ("category", category.clone())],
                        );
                        buffer.push(&category, entry);
                        summary.digest_buffered += 1;
                    }
                }
            }
            Classification::Excluded => {
                summary.excluded += 1;
                continue;
            }
        }
        summary.processed += 1;
    }
    drop(route_span);

    if !buffer.is_empty() {
        let _s = log.span_kv(&PushPhase::Digest, [("entries", buffer.len().to_string())]).entered();
        for (category, n) in buffer.categories() {
            log.debug(format!("  {category}: {n} entr(ies)"));
        }
        let messages = buffer.drain_packed(settings.digest_max_length);
        summary.digest_messages = messages.len();
        log.info(format!("🗞️ Sending digest — entries={} messages={}", summary.digest_buffered, messages.len()));
        for text in messages {
            deliver(sink, text, pacer, &mut summary).await;
        }
    }

    summary
}

/// Send one message; failures are logged and counted, never propagated.
/// A rate-limit reply gets exactly one retry after the advertised wait.
async fn deliver(sink: &dyn MessageSink, text: String, pacer: Pacer, summary: &mut PushSummary) {
    let log = telemetry::push();
    let _s = log.span(&PushPhase::Send).entered();
    let msg = OutboundMessage::new(sink.chat_id(), text);

    let mut result = sink.send(&msg).await;
    if let Some(wait) = result.as_ref().err().and_then(|e| e.retry_after()) {
        log.warn(format!("⏳ rate limited; retrying once in {}s", wait.as_secs()));
        tokio::time::sleep(wait).await;
        result = sink.send(&msg).await;
    }

    match result {
        Ok(()) if sink.delivers() => summary.sent += 1,
        Ok(()) => summary.discarded += 1,
        Err(err) => {
            summary.failed += 1;
            log.warn_kv(&format!("❌ send failed: {err}"), [
                ("error", err.to_string()),
                ("retryable", err.is_retryable().to_string()),
                ("chars", msg.text.chars().count().to_string()),
            ]);
        }
    }
    pacer.pause().await;
}

fn short_title(title: &str) -> String {
    let flat = title.replace('\n', " ");
    match flat.char_indices().nth(LOG_TITLE_CHARS) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
