use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A text message received from the platform, normalized for the relay core.
/// In-order delivery per sender is assumed; no ordering across senders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundText {
    pub sender: UserId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A send the relay wants performed: deliver `text` to `recipient`.
/// `markdown` asks the transport to render markdown (fan-out posts bold
/// their category label); sender-facing replies go out plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    pub recipient: UserId,
    pub text: String,
    pub markdown: bool,
}

impl Outbound {
    pub fn plain(recipient: UserId, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            markdown: false,
        }
    }

    pub fn markdown(recipient: UserId, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            markdown: true,
        }
    }
}
