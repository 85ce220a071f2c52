use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use flextea_types::UserId;

/// Who is registered and under which group. Registration doubles as
/// verification: the first text a user ever sends becomes their group name,
/// stored verbatim — no validation, accidental command text included.
#[derive(Clone, Default)]
pub struct Directory {
    inner: Arc<RwLock<HashMap<UserId, String>>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_registered(&self, user: UserId) -> bool {
        self.inner.read().await.contains_key(&user)
    }

    /// Idempotent-by-overwrite: re-registering replaces the stored group.
    pub async fn register(&self, user: UserId, group: impl Into<String>) {
        let group = group.into();
        info!("{} registered under group '{}'", user, group);
        self.inner.write().await.insert(user, group);
    }

    pub async fn group_of(&self, user: UserId) -> Option<String> {
        self.inner.read().await.get(&user).cloned()
    }

    /// Snapshot of every member of `group`.
    pub async fn members_of(&self, group: &str) -> Vec<UserId> {
        self.inner
            .read()
            .await
            .iter()
            .filter(|(_, g)| g.as_str() == group)
            .map(|(user, _)| *user)
            .collect()
    }

    /// Snapshot of every registered user.
    pub async fn all_members(&self) -> Vec<UserId> {
        self.inner.read().await.keys().copied().collect()
    }
}
