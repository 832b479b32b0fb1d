// chatsync/chatsync-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use chatsync_core::dtos::*;
use chatsync_core::infra::transport::LoopbackServer;
use chatsync_core::test::mock_data;
use chatsync_core::Chat;

use super::async_test;
use super::helpers::TestServer;

#[async_test]
async fn test_shutdown_is_idempotent() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    assert_eq!(server.server.subscriber_count(), 2);

    jane.shutdown();
    assert!(jane.is_shut_down());
    assert_eq!(server.server.subscriber_count(), 1);
    assert!(john.online_sessions().is_empty());

    jane.shutdown();
    assert_eq!(server.server.subscriber_count(), 1);

    Ok(())
}

#[async_test]
async fn test_dropping_chat_releases_subscription() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");

    {
        let _john = server.connect("John Doe", "session-b");
        assert_eq!(server.server.subscriber_count(), 2);
    }

    assert_eq!(server.server.subscriber_count(), 1);
    assert!(jane.online_sessions().is_empty());

    Ok(())
}

#[async_test]
async fn test_shut_down_session_ignores_further_events() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.shutdown();
    john.conversation.send_text("Anyone there?").await?;

    assert!(jane.texts().is_empty());
    assert_eq!(john.texts(), vec!["Anyone there?".to_string()]);

    Ok(())
}

#[async_test]
async fn test_listeners_are_notified_in_commit_order() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");

    let revisions = Arc::new(Mutex::new(vec![]));
    let last_view = Arc::new(Mutex::new(None));
    let subscription = jane.subscribe({
        let revisions = revisions.clone();
        let last_view = last_view.clone();
        move |change: &StateChange| {
            revisions.lock().push(change.revision);
            *last_view.lock() = Some(change.view.clone());
        }
    });

    jane.conversation.send_text("One").await?;
    jane.conversation.send_text("Two").await?;

    let seen = revisions.lock().clone();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    let last_view = last_view.lock().clone().expect("No change observed");
    assert!(Arc::ptr_eq(&last_view, &jane.state()));

    subscription.unsubscribe();
    jane.conversation.send_text("Three").await?;

    assert_eq!(*revisions.lock(), seen);
    assert_eq!(jane.texts().len(), 3);

    Ok(())
}

#[async_test]
async fn test_timer_task_ends_after_shutdown() -> Result<()> {
    let server = LoopbackServer::default();

    let chat = Chat::builder()
        .set_transport(server.connect("session-a"))
        .set_user(mock_data::user())
        .set_config(ChatConfig {
            presence_tick_interval_ms: 10,
            ..Default::default()
        })
        .build();

    let handle = chat.run_timers();
    tokio::time::sleep(Duration::from_millis(30)).await;
    chat.shutdown();

    tokio::time::timeout(Duration::from_secs(1), handle).await??;
    assert_eq!(server.subscriber_count(), 0);

    Ok(())
}
