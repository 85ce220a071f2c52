use serde_json::json;
use thiserror::Error;
use tracing::trace;

use flextea_types::UserId;

const API_BASE: &str = "https://api.telegram.org";

/// Why a single send did not go through. Fan-out callers log this and drop
/// it: a post never fails because one recipient was unreachable.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telegram rejected the call ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Thin Telegram Bot API client — only the calls the relay needs.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_base(API_BASE, token)
    }

    /// Point the client at a different API host.
    pub fn with_base(base: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{}", base.trim_end_matches('/'), token),
        }
    }

    /// One message to one chat. Fire-once: the caller decides whether the
    /// result matters.
    pub async fn send_text(
        &self,
        chat: UserId,
        text: &str,
        markdown: bool,
    ) -> Result<(), DeliveryError> {
        let mut payload = json!({ "chat_id": chat.0, "text": text });
        if markdown {
            payload["parse_mode"] = json!("Markdown");
        }
        self.call("sendMessage", &payload).await
    }

    /// Tell Telegram where to deliver updates.
    pub async fn set_webhook(&self, url: &str) -> Result<(), DeliveryError> {
        self.call("setWebhook", &json!({ "url": url })).await
    }

    async fn call(&self, method: &str, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        trace!("telegram {} ok", method);
        Ok(())
    }
}
