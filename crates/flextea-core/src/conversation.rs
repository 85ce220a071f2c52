use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use flextea_types::{Audience, Category, UserId};

/// Where a user is in the posting dialog. Each variant carries only the
/// fields valid for it, so "audience chosen but no category" or "category
/// chosen but unregistered" cannot be represented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Never seen before; the next text registers them.
    #[default]
    Unregistered,
    /// Registered with nothing in progress. The resting state, re-entered
    /// after every successful post.
    Idle,
    /// `/spill` received; waiting for a category pick.
    AwaitingCategory,
    /// Category picked; waiting for an audience pick.
    AwaitingAudience { category: Category },
    /// Audience picked; the next accepted text becomes the post body.
    Composing {
        category: Category,
        audience: Audience,
    },
}

/// Per-user dialog states. Absent means `Unregistered`; states are never
/// removed once created.
#[derive(Clone, Default)]
pub struct Conversations {
    inner: Arc<RwLock<HashMap<UserId, DialogState>>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state_of(&self, user: UserId) -> DialogState {
        self.inner
            .read()
            .await
            .get(&user)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, user: UserId, state: DialogState) {
        self.inner.write().await.insert(user, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unseen_users_start_unregistered() {
        let conversations = Conversations::new();
        assert_eq!(
            conversations.state_of(UserId(5)).await,
            DialogState::Unregistered
        );
    }

    #[tokio::test]
    async fn states_stick_per_user() {
        let conversations = Conversations::new();
        conversations.set(UserId(1), DialogState::AwaitingCategory).await;
        conversations
            .set(
                UserId(2),
                DialogState::AwaitingAudience {
                    category: Category::Complaint,
                },
            )
            .await;

        assert_eq!(
            conversations.state_of(UserId(1)).await,
            DialogState::AwaitingCategory
        );
        assert_eq!(
            conversations.state_of(UserId(2)).await,
            DialogState::AwaitingAudience {
                category: Category::Complaint
            }
        );
    }
}
