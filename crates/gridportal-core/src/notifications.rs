//! Ephemeral notification queue.
//!
//! Each notification added to the [`NotificationQueue`] is removed exactly
//! once: by its expiry task after the configured lifetime, or earlier by an
//! explicit [`NotificationQueue::remove`]. Whichever comes second finds the
//! entry gone and does nothing.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use gridportal_types::{
    Notification, NotificationEvent, NotificationId, NotificationKind, RemovalReason,
};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default time a notification stays visible.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(5);

/// Capacity of the notification event channel.
const BROADCAST_CAPACITY: usize = 128;

struct Entry {
    notification: Notification,
    expiry: JoinHandle<()>,
}

struct Inner {
    entries: Mutex<Vec<Entry>>,
    lifetime: Duration,
    tx: broadcast::Sender<NotificationEvent>,
}

/// Shared handle to the live notification list.
///
/// Cloning is cheap; all clones operate on the same list.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("lifetime", &self.inner.lifetime)
            .finish_non_exhaustive()
    }
}

impl NotificationQueue {
    /// Create an empty queue whose notifications live for `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                lifetime,
                tx,
            }),
        }
    }

    /// How long each notification stays in the queue.
    pub fn lifetime(&self) -> Duration {
        self.inner.lifetime
    }

    /// Append a notification and schedule its expiry.
    ///
    /// Returns as soon as the entry is in the list.
    pub async fn add(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            message,
            created_at: Utc::now(),
        };
        let id = notification.id;

        let mut entries = self.inner.entries.lock().await;
        let expiry = tokio::spawn(expire_after(
            Arc::downgrade(&self.inner),
            id,
            self.inner.lifetime,
        ));
        debug!(%id, ?kind, title = %notification.title, "notification added");
        self.publish(NotificationEvent::Added {
            notification: notification.clone(),
        });
        entries.push(Entry {
            notification,
            expiry,
        });
        id
    }

    /// Dismiss a notification before it expires.
    ///
    /// Returns `false` without side effects if the id is not in the list.
    pub async fn remove(&self, id: NotificationId) -> bool {
        let removed = {
            let mut entries = self.inner.entries.lock().await;
            take_entry(&mut entries, id)
        };
        match removed {
            Some(entry) => {
                entry.expiry.abort();
                debug!(%id, "notification dismissed");
                self.publish(NotificationEvent::Removed {
                    id,
                    reason: RemovalReason::Dismissed,
                });
                true
            }
            None => false,
        }
    }

    /// Live notifications in insertion order.
    pub async fn list(&self) -> Vec<Notification> {
        self.inner
            .entries
            .lock()
            .await
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// Subscribe to additions and removals.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.tx.subscribe()
    }

    fn publish(&self, event: NotificationEvent) -> usize {
        self.inner.publish(event)
    }
}

impl Inner {
    fn publish(&self, event: NotificationEvent) -> usize {
        // send fails only when nobody is subscribed.
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

fn take_entry(entries: &mut Vec<Entry>, id: NotificationId) -> Option<Entry> {
    let position = entries.iter().position(|e| e.notification.id == id)?;
    Some(entries.remove(position))
}

async fn expire_after(inner: Weak<Inner>, id: NotificationId, lifetime: Duration) {
    tokio::time::sleep(lifetime).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let removed = {
        let mut entries = inner.entries.lock().await;
        take_entry(&mut entries, id)
    };
    if removed.is_some() {
        debug!(%id, "notification expired");
        inner.publish(NotificationEvent::Removed {
            id,
            reason: RemovalReason::Expired,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_lifetime() {
        let queue = NotificationQueue::default();
        queue
            .add(NotificationKind::Success, "Message Sent", None)
            .await;
        assert_eq!(queue.list().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(queue.list().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(queue.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn list_preserves_insertion_order() {
        let queue = NotificationQueue::default();
        let first = queue.add(NotificationKind::Info, "first", None).await;
        let second = queue
            .add(NotificationKind::Warning, "second", Some(String::from("detail")))
            .await;
        let ids: Vec<_> = queue.list().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_twice_is_a_no_op() {
        let queue = NotificationQueue::default();
        let keep = queue.add(NotificationKind::Info, "keep", None).await;
        let drop_me = queue.add(NotificationKind::Error, "drop", None).await;

        assert!(queue.remove(drop_me).await);
        let after_first = queue.list().await;
        assert!(!queue.remove(drop_me).await);
        let after_second = queue.list().await;

        assert_eq!(after_first, after_second);
        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first.first().map(|n| n.id), Some(keep));
    }

    #[tokio::test(start_paused = true)]
    async fn each_notification_is_removed_once() {
        let queue = NotificationQueue::default();
        let mut rx = queue.subscribe();
        let id = queue.add(NotificationKind::Info, "hello", None).await;

        assert!(queue.remove(id).await);
        tokio::time::sleep(Duration::from_secs(10)).await;

        let added = rx.recv().await.unwrap();
        assert!(matches!(added, NotificationEvent::Added { .. }));
        let removed = rx.recv().await.unwrap();
        assert_eq!(
            removed,
            NotificationEvent::Removed {
                id,
                reason: RemovalReason::Dismissed,
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_is_published() {
        let queue = NotificationQueue::new(Duration::from_millis(100));
        let mut rx = queue.subscribe();
        let id = queue.add(NotificationKind::Success, "done", None).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        let _added = rx.recv().await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            NotificationEvent::Removed {
                id,
                reason: RemovalReason::Expired,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn remove_unknown_id_is_false() {
        let queue = NotificationQueue::default();
        assert!(!queue.remove(NotificationId::new()).await);
    }
}
