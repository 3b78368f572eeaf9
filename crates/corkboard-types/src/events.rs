use serde::{Deserialize, Serialize};

use crate::models::{Collection, Item};

/// Events sent to live-feed subscribers over the WebSocket gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Connection established; commands are accepted from here on.
    Ready,

    /// Full ordered state of one collection, newest first. Sent once on
    /// subscribe and again on every change — never a diff. An empty item
    /// list is a real state, distinct from "no snapshot yet".
    Snapshot {
        collection: Collection,
        items: Vec<Item>,
    },
}

/// Commands sent FROM client TO server over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Start live snapshots for the given collections. Already-subscribed
    /// collections are left untouched.
    Subscribe { collections: Vec<Collection> },

    /// Stop snapshots for one collection. Safe to repeat.
    Unsubscribe { collection: Collection },

    /// Narrow delivered snapshots, with the same matching rules the list
    /// endpoints use. Cached state is re-sent immediately under the new
    /// filter.
    SetFilter {
        search_term: String,
        category: String,
    },
}
