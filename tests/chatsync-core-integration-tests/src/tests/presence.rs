// chatsync/chatsync-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use chrono::TimeDelta;
use pretty_assertions::assert_eq;

use chatsync_core::dtos::*;
use chatsync_core::ClientEvent;

use super::async_test;
use super::helpers::TestServer;

#[async_test]
async fn test_online_users_exclude_self() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    assert_eq!(jane.online_sessions(), vec![SessionId::from("session-b")]);
    assert_eq!(john.online_sessions(), vec![SessionId::from("session-a")]);
    assert!(jane.state().is_online(&"session-b".into()));
    assert!(!jane.state().is_online(&"session-a".into()));

    Ok(())
}

#[async_test]
async fn test_silent_session_goes_offline() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let _john = server.connect("John Doe", "session-b");

    server.clock.advance(TimeDelta::seconds(20));
    server
        .server
        .heartbeat(OnlineUser::new("John Doe", "session-b"));

    server.clock.advance(TimeDelta::seconds(20));
    jane.tick();
    assert_eq!(jane.online_sessions(), vec![SessionId::from("session-b")]);
    jane.take_events();

    server.clock.advance(TimeDelta::seconds(11));
    jane.tick();
    assert!(jane.online_sessions().is_empty());
    assert_eq!(jane.take_events(), vec![ClientEvent::OnlineUsersChanged]);

    // Nothing left to expire.
    jane.tick();
    assert!(jane.take_events().is_empty());

    Ok(())
}

#[async_test]
async fn test_remote_typing_state_expires() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");
    jane.take_events();

    john.conversation.set_typing(true);
    assert_eq!(jane.typing_sessions(), vec![SessionId::from("session-b")]);
    assert_eq!(jane.take_events(), vec![ClientEvent::TypingUsersChanged]);

    server.clock.advance(TimeDelta::seconds(11));
    jane.tick();

    assert!(jane.typing_sessions().is_empty());
    assert_eq!(jane.online_sessions(), vec![SessionId::from("session-b")]);

    Ok(())
}

#[async_test]
async fn test_local_typing_stops_after_idle_timeout() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    john.conversation.set_typing(true);
    server.clock.advance(TimeDelta::seconds(2));
    john.conversation.set_typing(true);
    server.clock.advance(TimeDelta::seconds(2));
    john.tick();

    // The second keypress restarted the idle timeout.
    assert_eq!(jane.typing_sessions(), vec![SessionId::from("session-b")]);

    server.clock.advance(TimeDelta::seconds(1));
    john.tick();

    assert!(jane.typing_sessions().is_empty());

    Ok(())
}

#[async_test]
async fn test_sending_a_message_stops_typing() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    john.conversation.set_typing(true);
    assert!(jane.state().is_typing(&"session-b".into()));

    john.conversation.send_text("Done typing").await?;

    assert!(!jane.state().is_typing(&"session-b".into()));
    assert_eq!(jane.texts(), vec!["Done typing".to_string()]);

    Ok(())
}
