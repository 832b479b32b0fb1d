// chatsync/chatsync-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use pretty_assertions::assert_eq;

use chatsync_core::dtos::*;
use chatsync_core::ClientEvent;

use super::async_test;
use super::helpers::TestServer;

#[async_test]
async fn test_sent_message_appears_exactly_once() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");
    jane.take_events();
    john.take_events();

    let local_id = jane.conversation.send_text("Hello").await?;

    assert!(local_id.is_local());
    assert!(jane.message(&local_id).is_none());
    assert_eq!(jane.texts(), vec!["Hello".to_string()]);
    assert_eq!(john.texts(), vec!["Hello".to_string()]);

    let message = jane
        .message(&"m1".into())
        .expect("Missing confirmed message");
    assert_eq!(message.delivery, DeliveryState::Delivered);
    assert_eq!(message.message.sender.name, "Jane Doe");

    let jane_events = jane.take_events();
    assert_eq!(
        jane_events.first(),
        Some(&ClientEvent::MessagesAppended {
            message_ids: vec![local_id.clone()]
        })
    );
    assert!(jane_events.contains(&ClientEvent::PendingMessageConfirmed {
        local_id,
        message_id: "m1".into()
    }));
    assert!(john.take_events().contains(&ClientEvent::MessagesAppended {
        message_ids: vec!["m1".into()]
    }));

    Ok(())
}

#[async_test]
async fn test_late_joiner_receives_history() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");

    jane.conversation.send_text("First").await?;
    server.clock.advance(chrono::TimeDelta::seconds(1));
    jane.conversation.send_text("Second").await?;

    let john = server.connect("John Doe", "session-b");

    assert_eq!(
        john.texts(),
        vec!["First".to_string(), "Second".to_string()]
    );
    assert!(john.state().is_sorted());

    Ok(())
}

#[async_test]
async fn test_failed_send_can_be_retried() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    server.server.fail_sends(true);
    let local_id = jane.conversation.send_text("Hello").await?;

    let entry = jane.message(&local_id).expect("Missing optimistic message");
    assert_eq!(entry.delivery, DeliveryState::Failed);
    assert!(john.texts().is_empty());

    server.server.fail_sends(false);
    jane.conversation.retry_send(&local_id).await?;

    assert!(jane.message(&local_id).is_none());
    assert_eq!(jane.texts(), vec!["Hello".to_string()]);
    assert_eq!(john.texts(), vec!["Hello".to_string()]);
    assert_eq!(server.server.messages().len(), 1);

    // Already confirmed.
    assert!(matches!(
        jane.conversation.retry_send(&local_id).await,
        Err(ChatError::Validation(ValidationError::NotRetryable(_)))
    ));

    Ok(())
}

#[async_test]
async fn test_reply_carries_snapshot_of_target() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.conversation.send_text("Lunch?").await?;
    let target_id = john.last_message_id();
    john.conversation.send_reply("Sure", &target_id).await?;

    let reply = jane.message(&"m2".into()).expect("Missing reply");
    assert_eq!(
        reply.message.reply_to,
        Some(ReplyTo {
            id: target_id,
            text: "Lunch?".to_string(),
            sender: "Jane Doe".to_string(),
        })
    );

    assert!(matches!(
        john.conversation
            .send_reply("Huh?", &"m99".into())
            .await,
        Err(ChatError::Validation(ValidationError::UnknownReplyTarget(_)))
    ));

    Ok(())
}

#[async_test]
async fn test_reaction_is_applied_once_on_every_session() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.conversation.send_text("Hello").await?;
    let id = MessageId::from("m1");

    john.conversation.add_reaction(&id, "👍".into()).await?;
    john.conversation.add_reaction(&id, "👍".into()).await?;

    let expected = vec![Emoji::from("👍"), Emoji::from("👍")];
    assert_eq!(jane.message(&id).map(|m| m.message.reactions), Some(expected.clone()));
    assert_eq!(john.message(&id).map(|m| m.message.reactions), Some(expected.clone()));
    assert_eq!(server.server.messages()[0].reactions, expected);

    Ok(())
}

#[async_test]
async fn test_failed_reaction_is_not_rolled_back() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");

    jane.conversation.send_text("Hello").await?;
    let id = MessageId::from("m1");

    server.server.fail_reactions(true);
    jane.conversation.add_reaction(&id, "🎉".into()).await?;

    assert_eq!(
        jane.message(&id).map(|m| m.message.reactions),
        Some(vec![Emoji::from("🎉")])
    );
    assert!(server.server.messages()[0].reactions.is_empty());

    Ok(())
}

#[async_test]
async fn test_delete_propagates_to_all_sessions() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.conversation.send_text("Oops").await?;
    let id = MessageId::from("m1");
    john.take_events();

    assert!(matches!(
        john.conversation.delete_message(&id).await,
        Err(ChatError::Validation(ValidationError::NotMessageOwner(_)))
    ));

    jane.conversation.delete_message(&id).await?;

    assert!(jane.texts().is_empty());
    assert!(john.texts().is_empty());
    assert!(server.server.messages().is_empty());
    assert_eq!(
        john.take_events(),
        vec![ClientEvent::MessagesDeleted {
            message_ids: vec![id]
        }]
    );

    Ok(())
}

#[async_test]
async fn test_failed_delete_restores_message() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.conversation.send_text("Keep me").await?;
    let id = MessageId::from("m1");
    let before = jane.message(&id);

    server.server.fail_deletes(true);
    jane.conversation.delete_message(&id).await?;

    assert_eq!(jane.message(&id), before);
    assert_eq!(john.texts(), vec!["Keep me".to_string()]);
    assert_eq!(server.server.messages().len(), 1);

    Ok(())
}

#[async_test]
async fn test_sends_image() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect("Jane Doe", "session-a");
    let john = server.connect("John Doe", "session-b");

    jane.conversation
        .send_image(ImageFile::new("cat.png", vec![0; 16]))
        .await?;

    let message = john.message(&"m1".into()).expect("Missing image message");
    assert_eq!(
        message.message.content(),
        MessageContent::Image {
            url: "https://uploads.loopback.invalid/1/cat.png".to_string()
        }
    );

    server.server.fail_uploads(true);
    let result = jane
        .conversation
        .send_image(ImageFile::new("dog.png", vec![0; 16]))
        .await;
    assert!(matches!(result, Err(ChatError::Upload(_))));
    assert_eq!(jane.state().messages().len(), 1);

    Ok(())
}

#[async_test]
async fn test_sessions_without_capabilities_ignore_deletes_and_reactions() -> Result<()> {
    let server = TestServer::new();
    let jane = server.connect_with_capabilities(
        "Jane Doe",
        "session-a",
        TransportCapabilities::none(),
    );

    jane.conversation.send_text("Hello").await?;
    let id = MessageId::from("m1");

    jane.conversation.add_reaction(&id, "👍".into()).await?;
    jane.conversation.delete_message(&id).await?;

    let entry = jane.message(&id).expect("Missing message");
    assert!(entry.message.reactions.is_empty());
    assert_eq!(server.server.messages().len(), 1);

    Ok(())
}
