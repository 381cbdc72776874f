use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use super::{DeliveryError, MessageSink, OutboundMessage};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const PARSE_MODE_HTML: &str = "HTML";

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }
}

/// Bot API `sendMessage` sink.
pub struct TelegramSink {
    http: HttpClient,
    cfg: TelegramConfig,
}

impl TelegramSink {
    pub fn new(cfg: TelegramConfig) -> Result<Self, DeliveryError> {
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(DeliveryError::from_reqwest)?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.cfg.base_url.trim_end_matches('/'), self.cfg.bot_token)
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    fn chat_id(&self) -> &str { &self.cfg.chat_id }

    async fn send(&self, msg: &OutboundMessage) -> Result<(), DeliveryError> {
        let body = SendMessageRequest::from(msg);
        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(DeliveryError::from_reqwest)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(DeliveryError::from_reqwest)?;
        interpret_response(status, &bytes)
    }
}

fn interpret_response(status: StatusCode, bytes: &[u8]) -> Result<(), DeliveryError> {
    let parsed = serde_json::from_slice::<ApiResponse>(bytes);
    if status.is_success() {
        let parsed = parsed.map_err(DeliveryError::Decode)?;
        if parsed.ok { return Ok(()); }
        return Err(DeliveryError::Api { status, description: parsed.description.unwrap_or_default() });
    }

    let parsed = parsed.ok();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = parsed
            .as_ref()
            .and_then(|p| p.parameters.as_ref())
            .and_then(|p| p.retry_after)
            .unwrap_or(1);
        return Err(DeliveryError::RateLimited { retry_after_secs });
    }
    let description = parsed
        .and_then(|p| p.description)
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
    Err(DeliveryError::Api { status, description })
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

impl<'a> From<&'a OutboundMessage> for SendMessageRequest<'a> {
    fn from(msg: &'a OutboundMessage) -> Self {
        Self {
            chat_id: &msg.chat_id,
            text: &msg.text,
            parse_mode: PARSE_MODE_HTML,
            disable_web_page_preview: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_html_without_previews() {
        let msg = OutboundMessage::new("-100123", "<b>hi</b>");
        let value = serde_json::to_value(SendMessageRequest::from(&msg)).unwrap();
        assert_eq!(value["chat_id"], "-100123");
        assert_eq!(value["text"], "<b>hi</b>");
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(value["disable_web_page_preview"], true);
    }

    #[test]
    fn endpoint_embeds_token() {
        let sink = TelegramSink::new(TelegramConfig::new("123:abc", "42", Duration::from_secs(5))).unwrap();
        assert_eq!(sink.endpoint(), "https://api.telegram.org/bot123:abc/sendMessage");
        assert_eq!(sink.chat_id(), "42");
    }

    #[test]
    fn ok_response_is_success() {
        let body = br#"{"ok":true,"result":{"message_id":1}}"#;
        assert!(interpret_response(StatusCode::OK, body).is_ok());
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let body = br#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 7","parameters":{"retry_after":7}}"#;
        match interpret_response(StatusCode::TOO_MANY_REQUESTS, body) {
            Err(DeliveryError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 7),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn api_error_keeps_description() {
        let body = br#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        match interpret_response(StatusCode::BAD_REQUEST, body) {
            Err(DeliveryError::Api { status, description }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_reported_verbatim() {
        match interpret_response(StatusCode::BAD_GATEWAY, b"upstream down") {
            Err(DeliveryError::Api { description, .. }) => assert_eq!(description, "upstream down"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
