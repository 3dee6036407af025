//! Event-to-WebSocket relay.
//!
//! [`RealtimeRelay`] subscribes to the platform event bus and pushes
//! `{ "type": <event_type>, "data": <record> }` frames to the connections of
//! every profile listed in the event's `notify_user_ids`.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use tokio::sync::broadcast;
use fait_core::types::DbId;
use fait_events::PlatformEvent;

use crate::ws::WsManager;

pub struct RealtimeRelay {
    ws_manager: Arc<WsManager>,
}

impl RealtimeRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Relay events until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.relay(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime relay shutting down");
                    break;
                }
            }
        }
    }

    async fn relay(&self, event: &PlatformEvent) {
        let Some((user_ids, text)) = build_frame(event) else {
            return;
        };

        let mut delivered = 0;
        for user_id in user_ids {
            delivered += self
                .ws_manager
                .send_to_user(user_id, Message::Text(text.clone().into()))
                .await;
        }
        tracing::debug!(event_type = %event.event_type, delivered, "Realtime frame relayed");
    }
}

/// Recipients and serialized frame for an event, or `None` when the event
/// carries no recipients or no record.
pub fn build_frame(event: &PlatformEvent) -> Option<(Vec<DbId>, String)> {
    let user_ids = event.notify_user_ids();
    if user_ids.is_empty() {
        return None;
    }
    let record = event.record()?;
    let frame = json!({
        "type": event.event_type,
        "data": record,
    });
    Some((user_ids, frame.to_string()))
}
