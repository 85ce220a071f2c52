use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use flextea_types::{Audience, Category, MessageId, Outbound, UserId};

use crate::conversation::{Conversations, DialogState};
use crate::directory::Directory;
use crate::filter;
use crate::prompts;
use crate::router::Router;

/// The coordinating service: owns the directory, the per-user dialog states
/// and the message router, and turns one inbound text into a batch of
/// outbound sends (the sender's reply plus any fan-out or reply
/// notifications). All registry access goes through here.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

struct RelayInner {
    directory: Directory,
    conversations: Conversations,
    router: Router,
    /// One lock per user: concurrent events from the same sender serialize
    /// against each other; different senders proceed in parallel.
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl Relay {
    pub fn new() -> Self {
        let directory = Directory::new();
        Self {
            inner: Arc::new(RelayInner {
                conversations: Conversations::new(),
                router: Router::new(directory.clone()),
                directory,
                user_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Single entry point for every inbound text event.
    pub async fn handle(&self, sender: UserId, text: &str) -> Vec<Outbound> {
        let lock = self.lock_for(sender).await;
        let _guard = lock.lock().await;

        let text = text.trim();

        if !self.inner.directory.is_registered(sender).await {
            // First contact: whatever they sent becomes their group name,
            // command text included.
            self.inner.directory.register(sender, text).await;
            self.inner.conversations.set(sender, DialogState::Idle).await;
            return vec![Outbound::plain(sender, prompts::registered(text))];
        }

        match self.inner.conversations.state_of(sender).await {
            DialogState::Unregistered | DialogState::Idle => self.handle_idle(sender, text).await,
            DialogState::AwaitingCategory => self.handle_category_pick(sender, text).await,
            DialogState::AwaitingAudience { category } => {
                self.handle_audience_pick(sender, category, text).await
            }
            DialogState::Composing { category, audience } => {
                self.handle_compose(sender, category, audience, text).await
            }
        }
    }

    async fn lock_for(&self, user: UserId) -> Arc<Mutex<()>> {
        self.inner
            .user_locks
            .lock()
            .await
            .entry(user)
            .or_default()
            .clone()
    }

    async fn handle_idle(&self, sender: UserId, text: &str) -> Vec<Outbound> {
        if text.eq_ignore_ascii_case("/spill") {
            self.inner
                .conversations
                .set(sender, DialogState::AwaitingCategory)
                .await;
            return vec![Outbound::plain(sender, prompts::category_menu())];
        }

        if text.starts_with("/reply") {
            return self.handle_reply_intent(sender, text).await;
        }

        // Free text while idle either completes a pending reply or gets the
        // help fallback. Digits are ordinary content here.
        match self.inner.router.deliver_reply(sender, text).await {
            Some(delivered) => {
                info!("anonymous reply delivered for {}", delivered.message_id);
                vec![
                    Outbound::plain(
                        delivered.author,
                        prompts::reply_notification(delivered.message_id, text),
                    ),
                    Outbound::plain(sender, prompts::REPLY_SENT),
                ]
            }
            None => vec![Outbound::plain(sender, prompts::HELP)],
        }
    }

    /// `/reply <id>`: validate the shape, then the id, before any slot is
    /// created. Both failures leave every map untouched.
    async fn handle_reply_intent(&self, sender: UserId, text: &str) -> Vec<Outbound> {
        let mut parts = text.split_whitespace();
        let _command = parts.next();
        let id: MessageId = match (parts.next(), parts.next()) {
            (Some(raw), None) => match raw.parse() {
                Ok(id) => id,
                Err(_) => return vec![Outbound::plain(sender, prompts::BAD_REPLY_FORMAT)],
            },
            _ => return vec![Outbound::plain(sender, prompts::BAD_REPLY_FORMAT)],
        };

        if self.inner.router.begin_reply(sender, id).await {
            vec![Outbound::plain(sender, prompts::REPLY_PROMPT)]
        } else {
            vec![Outbound::plain(sender, prompts::unknown_message(id))]
        }
    }

    async fn handle_category_pick(&self, sender: UserId, text: &str) -> Vec<Outbound> {
        match menu_pick(text).and_then(Category::from_menu_index) {
            Some(category) => {
                self.inner
                    .conversations
                    .set(sender, DialogState::AwaitingAudience { category })
                    .await;
                vec![Outbound::plain(sender, prompts::audience_menu())]
            }
            None => vec![Outbound::plain(sender, prompts::MENU_FALLBACK)],
        }
    }

    async fn handle_audience_pick(
        &self,
        sender: UserId,
        category: Category,
        text: &str,
    ) -> Vec<Outbound> {
        match menu_pick(text).and_then(Audience::from_menu_index) {
            Some(audience) => {
                self.inner
                    .conversations
                    .set(sender, DialogState::Composing { category, audience })
                    .await;
                vec![Outbound::plain(sender, prompts::COMPOSE)]
            }
            None => vec![Outbound::plain(sender, prompts::MENU_FALLBACK)],
        }
    }

    async fn handle_compose(
        &self,
        sender: UserId,
        category: Category,
        audience: Audience,
        text: &str,
    ) -> Vec<Outbound> {
        if !filter::allows(text) {
            // Still composing; they can try again.
            return vec![Outbound::plain(sender, prompts::REPHRASE)];
        }

        let (id, mut sends) = self.inner.router.post(sender, category, audience, text).await;
        self.inner.conversations.set(sender, DialogState::Idle).await;
        info!("{} fanned out to {} recipients", id, sends.len());

        sends.push(Outbound::plain(sender, prompts::POSTED));
        sends
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

/// Digit-only 1-based menu selection. Signs, spaces and anything non-digit
/// fall through to the caller's fallback.
fn menu_pick(text: &str) -> Option<usize> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_pick_accepts_plain_digits_only() {
        assert_eq!(menu_pick("2"), Some(2));
        assert_eq!(menu_pick("10"), Some(10));
        assert_eq!(menu_pick("+2"), None);
        assert_eq!(menu_pick("2a"), None);
        assert_eq!(menu_pick(""), None);
        assert_eq!(menu_pick("two"), None);
    }

    #[tokio::test]
    async fn first_text_registers_whatever_it_says() {
        let relay = Relay::new();
        let out = relay.handle(UserId(1), "/spill").await;
        assert_eq!(out.len(), 1);
        assert!(out[0].text.contains("verified under group: /spill"));
    }

    #[tokio::test]
    async fn spill_is_case_insensitive() {
        let relay = Relay::new();
        relay.handle(UserId(1), "StoreA").await;
        let out = relay.handle(UserId(1), "/SPILL").await;
        assert!(out[0].text.contains("What would you like to post?"));
    }

    #[tokio::test]
    async fn idle_free_text_gets_the_help_fallback() {
        let relay = Relay::new();
        relay.handle(UserId(1), "StoreA").await;
        let out = relay.handle(UserId(1), "hello?").await;
        assert_eq!(out, vec![Outbound::plain(UserId(1), prompts::HELP)]);
    }

    #[tokio::test]
    async fn malformed_and_unknown_replies_are_distinct_errors() {
        let relay = Relay::new();
        relay.handle(UserId(1), "StoreA").await;

        let out = relay.handle(UserId(1), "/reply").await;
        assert_eq!(out[0].text, prompts::BAD_REPLY_FORMAT);

        let out = relay.handle(UserId(1), "/reply MSG1 extra").await;
        assert_eq!(out[0].text, prompts::BAD_REPLY_FORMAT);

        let out = relay.handle(UserId(1), "/reply nope").await;
        assert_eq!(out[0].text, prompts::BAD_REPLY_FORMAT);

        let out = relay.handle(UserId(1), "/reply MSG1").await;
        assert_eq!(out[0].text, prompts::unknown_message(MessageId(1)));
    }
}
