use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::NotificationRecord;
use super::repository::{NotificationRepository, RepositoryError};

/// Identifier of a live delivery channel (a WebSocket connection in
/// production).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Push delivery error. Always swallowed by the dispatcher; the durable
/// record has been written by the time a push is attempted.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("push transport unavailable: {0}")]
    Transport(String),
}

/// Outbound real-time transport, injectable so tests can record pushes.
pub trait PushTransport: Send + Sync {
    fn push(&self, channel: &ChannelId, payload: serde_json::Value) -> Result<(), DispatchError>;
}

/// Process-local map of recipient id to their active delivery channel.
///
/// Registration is last-writer-wins: a user with two live sessions only
/// receives pushes on the most recently registered channel. Unregistering
/// removes a mapping only while it still points at the closing channel.
#[derive(Default)]
pub struct PresenceRegistry {
    channels: RwLock<HashMap<String, ChannelId>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, recipient_id: &str, channel: ChannelId) {
        let mut channels = self.channels.write().expect("presence lock poisoned");
        channels.insert(recipient_id.to_string(), channel);
    }

    pub fn unregister(&self, channel: &ChannelId) {
        let mut channels = self.channels.write().expect("presence lock poisoned");
        channels.retain(|_, mapped| mapped != channel);
    }

    pub fn channel_for(&self, recipient_id: &str) -> Option<ChannelId> {
        let channels = self.channels.read().expect("presence lock poisoned");
        channels.get(recipient_id).cloned()
    }

    pub fn online_count(&self) -> usize {
        let channels = self.channels.read().expect("presence lock poisoned");
        channels.len()
    }
}

/// Persists notifications and pushes them to online recipients.
///
/// Persistence is unconditional; delivery is best-effort, at-most-once, with
/// no retry. An offline recipient finds the record through the listing API.
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationRepository>,
    presence: Arc<PresenceRegistry>,
    transport: Arc<dyn PushTransport>,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn NotificationRepository>,
        presence: Arc<PresenceRegistry>,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        Self {
            store,
            presence,
            transport,
        }
    }

    pub fn send(
        &self,
        record: NotificationRecord,
    ) -> Result<NotificationRecord, RepositoryError> {
        let stored = self.store.insert(record)?;
        self.deliver(&stored);
        Ok(stored)
    }

    fn deliver(&self, record: &NotificationRecord) {
        let Some(channel) = self.presence.channel_for(&record.recipient_id) else {
            debug!(recipient = %record.recipient_id, "recipient offline, skipping push");
            return;
        };

        let payload = match serde_json::to_value(record) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(recipient = %record.recipient_id, %err, "notification not serializable");
                return;
            }
        };

        if let Err(err) = self.transport.push(&channel, payload) {
            debug!(recipient = %record.recipient_id, %err, "push failed, record stays durable");
        }
    }
}
