use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

mod telegram;

pub use telegram::{TelegramConfig, TelegramSink};

/// One outbound chat message. Always HTML, link previews off.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: String,
    pub text: String,
}

impl OutboundMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { chat_id: chat_id.into(), text: text.into() }
    }
}

#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Chat id messages are addressed to.
    fn chat_id(&self) -> &str;
    /// False for sinks that drop messages instead of delivering them.
    fn delivers(&self) -> bool { true }
    async fn send(&self, msg: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Used without credentials or under --dry-run: log and drop.
#[derive(Debug, Default)]
pub struct DiscardSink;

#[async_trait]
impl MessageSink for DiscardSink {
    fn chat_id(&self) -> &str { "" }

    fn delivers(&self) -> bool { false }

    async fn send(&self, msg: &OutboundMessage) -> Result<(), DeliveryError> {
        tracing::debug!(chars = msg.text.chars().count(), "discarding message (delivery disabled)");
        tracing::trace!(text = %msg.text, "discarded message body");
        Ok(())
    }
}

/// Fixed pause inserted after each send attempt.
#[derive(Clone, Copy, Debug)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self { Self { delay } }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[derive(Debug)]
pub enum DeliveryError {
    Http(reqwest::Error),
    Timeout,
    Api { status: StatusCode, description: String },
    RateLimited { retry_after_secs: u64 },
    Decode(serde_json::Error),
}

impl DeliveryError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() { DeliveryError::Timeout } else { DeliveryError::Http(err) }
    }

    /// How long to wait before the single retry. Only a 429 is retried.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            DeliveryError::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool { self.retry_after().is_some() }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Http(err) => write!(f, "http error: {err}"),
            DeliveryError::Timeout => write!(f, "request timed out"),
            DeliveryError::Api { status, description } => write!(f, "api error {status}: {description}"),
            DeliveryError::RateLimited { retry_after_secs } => write!(f, "rate limited, retry after {retry_after_secs}s"),
            DeliveryError::Decode(err) => write!(f, "decode error: {err}"),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::Http(err) => Some(err),
            DeliveryError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records every message; pops scripted results, defaulting to success.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        results: Mutex<VecDeque<Result<(), DeliveryError>>>,
        sent: Mutex<Vec<OutboundMessage>>,
    }

    impl RecordingSink {
        pub fn new() -> Self { Self::default() }

        pub fn push_result(&self, res: Result<(), DeliveryError>) {
            self.results.lock().unwrap().push_back(res);
        }

        pub fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        fn chat_id(&self) -> &str { "test-chat" }

        async fn send(&self, msg: &OutboundMessage) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(msg.clone());
            self.results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_description() {
        let err = DeliveryError::Api { status: StatusCode::BAD_REQUEST, description: "Bad Request: can't parse entities".into() };
        assert_eq!(format!("{err}"), "api error 400 Bad Request: Bad Request: can't parse entities");
        assert!(!err.is_retryable());
    }

    #[test]
    fn only_rate_limit_is_retryable() {
        let limited = DeliveryError::RateLimited { retry_after_secs: 3 };
        assert!(limited.is_retryable());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(3)));

        let upstream = DeliveryError::Api { status: StatusCode::BAD_GATEWAY, description: "upstream".into() };
        assert!(!upstream.is_retryable());
        assert_eq!(upstream.retry_after(), None);
        assert!(!DeliveryError::Timeout.is_retryable());
    }

    #[tokio::test]
    async fn discard_sink_always_succeeds() {
        let sink = DiscardSink;
        assert!(!sink.delivers());
        assert!(sink.send(&OutboundMessage::new("", "hello")).await.is_ok());
    }

    #[tokio::test]
    async fn zero_pacer_returns_immediately() {
        Pacer::new(Duration::ZERO).pause().await;
    }
}
