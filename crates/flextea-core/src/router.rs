use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use flextea_types::{Audience, Category, Message, MessageId, Outbound, UserId};

use crate::directory::Directory;
use crate::prompts;

/// One intended anonymous reply to one message, waiting for its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySlot {
    pub replier: UserId,
    pub status: SlotStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Delivered(String),
}

/// Outcome of a completed reply: which message it answered and whose author
/// to notify. Both come out of a single locked lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveredReply {
    pub message_id: MessageId,
    pub author: UserId,
}

/// Owns the message registry and the reply threads, and resolves each
/// post's audience through the directory. Id assignment, registry writes
/// and thread appends all happen under one lock: ids are never duplicated,
/// appends never lost.
#[derive(Clone)]
pub struct Router {
    directory: Directory,
    inner: Arc<Mutex<RouterInner>>,
}

#[derive(Default)]
struct RouterInner {
    next_seq: u64,
    messages: HashMap<MessageId, Message>,
    /// BTreeMap iteration order is id order, i.e. message-creation order —
    /// exactly the order reply matching scans in.
    threads: BTreeMap<MessageId, Vec<ReplySlot>>,
}

impl Router {
    pub fn new(directory: Directory) -> Self {
        Self {
            directory,
            inner: Arc::new(Mutex::new(RouterInner::default())),
        }
    }

    /// Create a message, resolve its audience, and produce one fan-out send
    /// per recipient, author excluded. The post itself cannot fail; whether
    /// any individual send lands is the gateway's fire-once problem.
    pub async fn post(
        &self,
        author: UserId,
        category: Category,
        audience: Audience,
        body: impl Into<String>,
    ) -> (MessageId, Vec<Outbound>) {
        let body = body.into();

        let recipients = if audience.routes_to_everyone() {
            self.directory.all_members().await
        } else {
            // Office, store and team scopes all resolve to the author's own
            // group; the labels differ only in the menu.
            match self.directory.group_of(author).await {
                Some(group) => self.directory.members_of(&group).await,
                None => Vec::new(),
            }
        };

        let id = {
            let mut inner = self.inner.lock().await;
            inner.next_seq += 1;
            let id = MessageId(inner.next_seq);
            inner.messages.insert(
                id,
                Message {
                    id,
                    author,
                    category,
                    audience,
                    body: body.clone(),
                    created_at: Utc::now(),
                },
            );
            inner.threads.insert(id, Vec::new());
            id
        };

        let fan_out: Vec<Outbound> = recipients
            .into_iter()
            .filter(|recipient| *recipient != author)
            .map(|recipient| Outbound::markdown(recipient, prompts::fan_out(category, id, &body)))
            .collect();

        debug!("{} posted, fanning out to {} recipients", id, fan_out.len());
        (id, fan_out)
    }

    /// Open a pending reply slot on `id` for `replier`. False when the id
    /// names no known message; nothing is recorded in that case.
    pub async fn begin_reply(&self, replier: UserId, id: MessageId) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.threads.get_mut(&id) {
            Some(thread) => {
                thread.push(ReplySlot {
                    replier,
                    status: SlotStatus::Pending,
                });
                true
            }
            None => false,
        }
    }

    /// Complete the replier's first pending slot — threads scanned in
    /// creation order, slots in append order — marking it delivered and
    /// naming the author to notify. None when nothing is pending.
    pub async fn deliver_reply(&self, replier: UserId, text: &str) -> Option<DeliveredReply> {
        let mut inner = self.inner.lock().await;
        let RouterInner {
            messages, threads, ..
        } = &mut *inner;

        for (id, thread) in threads.iter_mut() {
            for slot in thread.iter_mut() {
                if slot.replier == replier && slot.status == SlotStatus::Pending {
                    slot.status = SlotStatus::Delivered(text.to_string());
                    let message = messages.get(id)?;
                    return Some(DeliveredReply {
                        message_id: *id,
                        author: message.author,
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_a_router() -> Router {
        let directory = Directory::new();
        directory.register(UserId(1), "StoreA").await;
        directory.register(UserId(2), "StoreA").await;
        directory.register(UserId(3), "StoreB").await;
        Router::new(directory)
    }

    fn recipients(batch: &[Outbound]) -> Vec<UserId> {
        let mut out: Vec<UserId> = batch.iter().map(|o| o.recipient).collect();
        out.sort();
        out
    }

    #[tokio::test]
    async fn ids_are_sequential_across_authors() {
        let router = store_a_router().await;
        let (a, _) = router
            .post(UserId(1), Category::Gossip, Audience::MyOffice, "one")
            .await;
        let (b, _) = router
            .post(UserId(3), Category::Complaint, Audience::AllFlexway, "two")
            .await;
        let (c, _) = router
            .post(UserId(1), Category::Suggestion, Audience::MyOffice, "three")
            .await;
        assert_eq!((a, b, c), (MessageId(1), MessageId(2), MessageId(3)));
    }

    #[tokio::test]
    async fn group_audiences_stay_in_the_group_and_skip_the_author() {
        let router = store_a_router().await;
        for audience in [
            Audience::MyOffice,
            Audience::SpecificStore,
            Audience::SpecificTeam,
        ] {
            let (_, batch) = router
                .post(UserId(1), Category::Gossip, audience, "hello")
                .await;
            assert_eq!(recipients(&batch), vec![UserId(2)]);
        }
    }

    #[tokio::test]
    async fn all_flexway_reaches_everyone_but_the_author() {
        let router = store_a_router().await;
        let (_, batch) = router
            .post(UserId(1), Category::Gossip, Audience::AllFlexway, "hello")
            .await;
        assert_eq!(recipients(&batch), vec![UserId(2), UserId(3)]);
    }

    #[tokio::test]
    async fn fan_out_text_carries_category_id_body_and_reply_hint() {
        let router = store_a_router().await;
        let (id, batch) = router
            .post(UserId(1), Category::Suggestion, Audience::MyOffice, "more tea")
            .await;
        let send = &batch[0];
        assert!(send.markdown);
        assert!(send.text.contains("Suggestion"));
        assert!(send.text.contains(&format!("#{id}")));
        assert!(send.text.contains("more tea"));
        assert!(send.text.contains(&format!("/reply {id}")));
    }

    #[tokio::test]
    async fn begin_reply_rejects_unknown_ids() {
        let router = store_a_router().await;
        assert!(!router.begin_reply(UserId(2), MessageId(9)).await);
        assert!(router.deliver_reply(UserId(2), "hello").await.is_none());
    }

    #[tokio::test]
    async fn reply_resolves_to_the_message_author() {
        let router = store_a_router().await;
        let (id, _) = router
            .post(UserId(1), Category::Gossip, Audience::MyOffice, "psst")
            .await;

        assert!(router.begin_reply(UserId(2), id).await);
        let delivered = router.deliver_reply(UserId(2), "tell me more").await.unwrap();
        assert_eq!(delivered.message_id, id);
        assert_eq!(delivered.author, UserId(1));

        // The slot was consumed; a second free text matches nothing.
        assert!(router.deliver_reply(UserId(2), "again").await.is_none());
    }

    #[tokio::test]
    async fn multiple_pending_slots_resolve_in_message_creation_order() {
        let router = store_a_router().await;
        let (first, _) = router
            .post(UserId(1), Category::Gossip, Audience::MyOffice, "one")
            .await;
        let (second, _) = router
            .post(UserId(3), Category::Gossip, Audience::AllFlexway, "two")
            .await;

        // Replier opens slots on both, newest first; the earliest-created
        // message still wins the match.
        assert!(router.begin_reply(UserId(2), second).await);
        assert!(router.begin_reply(UserId(2), first).await);

        let delivered = router.deliver_reply(UserId(2), "for the first").await.unwrap();
        assert_eq!(delivered.message_id, first);

        let delivered = router.deliver_reply(UserId(2), "for the second").await.unwrap();
        assert_eq!(delivered.message_id, second);
    }
}
