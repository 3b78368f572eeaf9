use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use corkboard_types::models::{Collection, Item};

/// One full-state publication for a collection.
#[derive(Debug, Clone)]
pub struct SnapshotEvent {
    pub collection: Collection,
    pub items: Vec<Item>,
}

/// Fans full snapshots out to every live subscriber. Writers publish the
/// re-queried state of a collection after each committed change.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    tx: broadcast::Sender<SnapshotEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(DispatcherInner { tx }),
        }
    }

    /// Open a live subscription to one collection.
    pub fn subscribe(&self, collection: Collection) -> Subscription {
        Subscription {
            collection,
            rx: Some(self.inner.tx.subscribe()),
        }
    }

    /// Publish the current full state of a collection to all subscribers.
    pub fn publish(&self, collection: Collection, items: Vec<Item>) {
        let _ = self.inner.tx.send(SnapshotEvent { collection, items });
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription failures are terminal: the handle stops delivering and the
/// consumer keeps whatever snapshot it last received.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("subscription cancelled")]
    Cancelled,
    #[error("dispatcher closed")]
    Closed,
}

/// Live snapshot feed for one collection. Dropping the handle cancels it;
/// `cancel` may be called any number of times.
pub struct Subscription {
    collection: Collection,
    rx: Option<broadcast::Receiver<SnapshotEvent>>,
}

impl Subscription {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.is_none()
    }

    /// Next full snapshot for this collection.
    pub async fn recv(&mut self) -> Result<Vec<Item>, SubscriptionError> {
        let rx = self.rx.as_mut().ok_or(SubscriptionError::Cancelled)?;
        loop {
            match rx.recv().await {
                Ok(event) if event.collection == self.collection => return Ok(event.items),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // A skipped snapshot is superseded by the next one; full
                    // state per event makes lag lossless.
                    warn!("Snapshot receiver lagged by {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.rx = None;
                    return Err(SubscriptionError::Closed);
                }
            }
        }
    }

    /// Stop delivery. Idempotent.
    pub fn cancel(&mut self) {
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use corkboard_types::models::{FoundItem, ItemCore};
    use uuid::Uuid;

    fn found(description: &str) -> Item {
        Item::Found(FoundItem {
            core: ItemCore {
                id: Uuid::new_v4(),
                description: description.into(),
                contact_info: "helpdesk@campus.edu".into(),
                tags: vec![],
                categories: vec![],
                created_at: Utc::now(),
                reported: false,
                report_reason: None,
                resolved: false,
            },
            location_found: "Library".into(),
            image_url: None,
            image_file_name: None,
        })
    }

    #[tokio::test]
    async fn delivers_snapshots_for_the_subscribed_collection() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(Collection::FoundItems);

        dispatcher.publish(Collection::FoundItems, vec![found("black wallet")]);
        let items = sub.recv().await.expect("snapshot");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].core().description, "black wallet");
    }

    #[tokio::test]
    async fn skips_snapshots_of_other_collections() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(Collection::LostItems);

        dispatcher.publish(Collection::FoundItems, vec![found("not for us")]);
        dispatcher.publish(Collection::LostItems, vec![]);

        let items = sub.recv().await.expect("snapshot");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_stops_delivery() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(Collection::FoundItems);

        sub.cancel();
        sub.cancel();
        assert!(sub.is_cancelled());

        dispatcher.publish(Collection::FoundItems, vec![found("missed")]);
        assert_eq!(sub.recv().await, Err(SubscriptionError::Cancelled));
    }

    #[tokio::test]
    async fn closed_dispatcher_is_terminal() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(Collection::FoundItems);
        drop(dispatcher);

        assert_eq!(sub.recv().await, Err(SubscriptionError::Closed));
        // The handle stays failed afterwards
        assert!(sub.is_cancelled());
    }
}
