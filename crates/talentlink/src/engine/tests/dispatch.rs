use std::sync::Arc;

use super::common::*;
use crate::engine::dispatch::{ChannelId, NotificationDispatcher, PresenceRegistry};
use crate::engine::domain::{NotificationKind, NotificationRecord, RecipientKind};
use crate::engine::repository::NotificationRepository;

fn record_for(recipient: &str) -> NotificationRecord {
    NotificationRecord::new(
        recipient,
        RecipientKind::Candidate,
        NotificationKind::AutoApplied,
        "Auto-applied successfully",
        "Your profile was automatically submitted",
    )
}

fn build_dispatcher(
    transport: Arc<RecordingTransport>,
) -> (
    NotificationDispatcher,
    Arc<MemoryNotifications>,
    Arc<PresenceRegistry>,
) {
    let store = Arc::new(MemoryNotifications::default());
    let presence = Arc::new(PresenceRegistry::new());
    let dispatcher = NotificationDispatcher::new(store.clone(), presence.clone(), transport);
    (dispatcher, store, presence)
}

#[test]
fn online_recipient_receives_a_push_on_their_channel() {
    let transport = Arc::new(RecordingTransport::default());
    let (dispatcher, store, presence) = build_dispatcher(transport.clone());
    presence.register("cand-1", ChannelId("channel-a".to_string()));

    dispatcher.send(record_for("cand-1")).expect("send succeeds");

    let pushes = transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].0, ChannelId("channel-a".to_string()));
    assert_eq!(pushes[0].1["recipient_id"], "cand-1");
    assert_eq!(store.all().len(), 1);
}

#[test]
fn offline_recipient_still_finds_the_record_in_the_listing() {
    let transport = Arc::new(RecordingTransport::default());
    let (dispatcher, store, _presence) = build_dispatcher(transport.clone());

    dispatcher.send(record_for("cand-1")).expect("send succeeds");

    assert!(transport.pushes().is_empty());
    let listed = store.for_recipient("cand-1").expect("listing succeeds");
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_read);
}

#[test]
fn last_registration_wins_for_a_recipient() {
    let transport = Arc::new(RecordingTransport::default());
    let (dispatcher, _store, presence) = build_dispatcher(transport.clone());
    presence.register("cand-1", ChannelId("channel-a".to_string()));
    presence.register("cand-1", ChannelId("channel-b".to_string()));

    dispatcher.send(record_for("cand-1")).expect("send succeeds");

    let pushes = transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].0, ChannelId("channel-b".to_string()));
}

#[test]
fn unregister_only_clears_the_current_channel() {
    let presence = PresenceRegistry::new();
    presence.register("cand-1", ChannelId("channel-a".to_string()));
    presence.register("cand-1", ChannelId("channel-b".to_string()));

    // The stale channel's disconnect must not tear down the new session.
    presence.unregister(&ChannelId("channel-a".to_string()));
    assert_eq!(
        presence.channel_for("cand-1"),
        Some(ChannelId("channel-b".to_string()))
    );

    presence.unregister(&ChannelId("channel-b".to_string()));
    assert_eq!(presence.channel_for("cand-1"), None);
    assert_eq!(presence.online_count(), 0);
}

#[test]
fn push_failure_is_swallowed_and_the_record_stays_durable() {
    let store = Arc::new(MemoryNotifications::default());
    let presence = Arc::new(PresenceRegistry::new());
    let dispatcher =
        NotificationDispatcher::new(store.clone(), presence.clone(), Arc::new(FailingTransport));
    presence.register("cand-1", ChannelId("channel-a".to_string()));

    dispatcher
        .send(record_for("cand-1"))
        .expect("delivery failure is not an error");

    assert_eq!(store.all().len(), 1);
}
