use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};

use corkboard_db::Database;
use corkboard_types::events::{GatewayCommand, GatewayEvent};
use corkboard_types::filter::filter_items;
use corkboard_types::models::{Collection, Item};

use crate::dispatcher::{Dispatcher, Subscription, SubscriptionError};

/// Per-connection view state: the last snapshot of each live collection and
/// how the client wants it narrowed.
struct ViewState {
    search_term: String,
    category: String,
    last: HashMap<Collection, Vec<Item>>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            search_term: String::new(),
            category: "all".into(),
            last: HashMap::new(),
        }
    }

    fn visible(&self, collection: Collection) -> Option<Vec<Item>> {
        self.last
            .get(&collection)
            .map(|items| filter_items(items, &self.search_term, &self.category))
    }
}

/// Handle a single WebSocket connection: a Ready greeting, then live
/// snapshots for whatever collections the client subscribes to.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, db: Arc<Database>) {
    let (mut sender, mut receiver) = socket.split();

    if send_event(&mut sender, &GatewayEvent::Ready).await.is_err() {
        return;
    }

    let mut found_sub: Option<Subscription> = None;
    let mut lost_sub: Option<Subscription> = None;
    let mut view = ViewState::new();

    loop {
        tokio::select! {
            result = next_snapshot(&mut found_sub) => {
                if !deliver(&mut sender, &mut found_sub, &mut view, Collection::FoundItems, result).await {
                    break;
                }
            }
            result = next_snapshot(&mut lost_sub) => {
                if !deliver(&mut sender, &mut lost_sub, &mut view, Collection::LostItems, result).await {
                    break;
                }
            }
            msg = next_command(&mut receiver) => {
                let command = match msg {
                    Some(command) => command,
                    None => break,
                };
                let keep_going = apply_command(
                    command,
                    &dispatcher,
                    &db,
                    &mut sender,
                    &mut found_sub,
                    &mut lost_sub,
                    &mut view,
                )
                .await;
                if !keep_going {
                    break;
                }
            }
        }
    }

    // Unconditional release on teardown, including before any snapshot
    // was delivered.
    if let Some(mut sub) = found_sub.take() {
        sub.cancel();
    }
    if let Some(mut sub) = lost_sub.take() {
        sub.cancel();
    }
    info!("Gateway connection closed");
}

/// Pending forever while there is no live subscription, so the select loop
/// is driven by the socket alone.
async fn next_snapshot(sub: &mut Option<Subscription>) -> Result<Vec<Item>, SubscriptionError> {
    match sub {
        Some(sub) => sub.recv().await,
        None => std::future::pending().await,
    }
}

/// Next parsed command from the socket; None once the peer is gone.
async fn next_command(receiver: &mut SplitStream<WebSocket>) -> Option<GatewayCommand> {
    loop {
        let msg = match receiver.next().await {
            Some(Ok(msg)) => msg,
            _ => return None,
        };
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return None,
            _ => continue,
        };
        match serde_json::from_str(&text) {
            Ok(command) => return Some(command),
            Err(e) => {
                warn!("Bad gateway command: {}", e);
                continue;
            }
        }
    }
}

async fn deliver(
    sender: &mut SplitSink<WebSocket, Message>,
    sub: &mut Option<Subscription>,
    view: &mut ViewState,
    collection: Collection,
    result: Result<Vec<Item>, SubscriptionError>,
) -> bool {
    match result {
        Ok(items) => {
            view.last.insert(collection, items);
            match view.visible(collection) {
                Some(visible) => {
                    send_event(sender, &GatewayEvent::Snapshot { collection, items: visible })
                        .await
                        .is_ok()
                }
                None => true,
            }
        }
        Err(e) => {
            // Terminal for this subscription; the client keeps the last
            // snapshot it was sent.
            warn!("Live subscription for {} failed: {}", collection, e);
            *sub = None;
            true
        }
    }
}

async fn apply_command(
    command: GatewayCommand,
    dispatcher: &Dispatcher,
    db: &Arc<Database>,
    sender: &mut SplitSink<WebSocket, Message>,
    found_sub: &mut Option<Subscription>,
    lost_sub: &mut Option<Subscription>,
    view: &mut ViewState,
) -> bool {
    match command {
        GatewayCommand::Subscribe { collections } => {
            for collection in collections {
                let slot = match collection {
                    Collection::FoundItems => &mut *found_sub,
                    Collection::LostItems => &mut *lost_sub,
                };
                if slot.is_some() {
                    continue;
                }
                // Subscribe before the initial read so a write landing in
                // between still reaches this connection.
                *slot = Some(dispatcher.subscribe(collection));

                let db = db.clone();
                match tokio::task::spawn_blocking(move || db.snapshot(collection)).await {
                    Ok(Ok(items)) => {
                        view.last.insert(collection, items);
                        if let Some(visible) = view.visible(collection) {
                            let event = GatewayEvent::Snapshot { collection, items: visible };
                            if send_event(sender, &event).await.is_err() {
                                return false;
                            }
                        }
                    }
                    Ok(Err(e)) => warn!("Initial snapshot for {} failed: {}", collection, e),
                    Err(e) => warn!("spawn_blocking join error: {}", e),
                }
            }
            true
        }
        GatewayCommand::Unsubscribe { collection } => {
            let slot = match collection {
                Collection::FoundItems => found_sub,
                Collection::LostItems => lost_sub,
            };
            if let Some(mut sub) = slot.take() {
                sub.cancel();
            }
            view.last.remove(&collection);
            true
        }
        GatewayCommand::SetFilter { search_term, category } => {
            view.search_term = search_term;
            view.category = category;
            // Re-render from cached snapshots without touching the store.
            for collection in [Collection::FoundItems, Collection::LostItems] {
                if let Some(visible) = view.visible(collection) {
                    let event = GatewayEvent::Snapshot { collection, items: visible };
                    if send_event(sender, &event).await.is_err() {
                        return false;
                    }
                }
            }
            true
        }
    }
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &GatewayEvent,
) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to encode gateway event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(payload.into())).await
}
