use chrono::{DateTime, Utc};
use serde::Deserialize;

use flextea_types::{InboundText, UserId};

/// One Telegram webhook update. Only private-chat text messages matter to
/// the relay; everything else deserializes fine and is ignored upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Incoming>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Incoming {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix seconds, as Telegram sends it.
    pub date: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Normalize to the relay's inbound event, or None for anything that is
    /// not a text message (stickers, joins, edits, ...).
    pub fn text_event(&self) -> Option<InboundText> {
        let message = self.message.as_ref()?;
        let text = message.text.as_ref()?;
        Some(InboundText {
            sender: UserId(message.chat.id),
            text: text.clone(),
            timestamp: DateTime::<Utc>::from_timestamp(message.date, 0).unwrap_or_default(),
        })
    }
}
