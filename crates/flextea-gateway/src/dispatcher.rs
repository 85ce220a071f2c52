use std::sync::Arc;

use tracing::warn;

use flextea_types::Outbound;

use crate::telegram::TelegramClient;

/// Delivers outbound batches. Each send runs as its own fire-once task: a
/// recipient that cannot be reached is logged and skipped — no retry, no
/// effect on the rest of the batch, no effect on the interaction that
/// produced it.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    client: TelegramClient,
}

impl Dispatcher {
    pub fn new(client: TelegramClient) -> Self {
        Self {
            inner: Arc::new(DispatcherInner { client }),
        }
    }

    /// Fan a batch out as independent tasks and return immediately.
    pub fn deliver(&self, batch: Vec<Outbound>) {
        for send in batch {
            let client = self.inner.client.clone();
            tokio::spawn(async move {
                if let Err(e) = client.send_text(send.recipient, &send.text, send.markdown).await {
                    warn!("delivery to {} failed: {}", send.recipient, e);
                }
            });
        }
    }
}
