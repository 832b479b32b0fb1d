// chatsync/chatsync-loopback
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::{env, fs};

use anyhow::{Context, Result};
use tracing::metadata::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use chatsync_core::dtos::*;
use chatsync_core::infra::transport::LoopbackServer;
use chatsync_core::Chat;

fn enable_debug_logging(max_level: Level) {
    let fmt_layer = tracing_subscriber::fmt::Layer::new()
        .with_target(false)
        .with_filter(LevelFilter::from_level(max_level));

    Registry::default().with(fmt_layer).init();
}

/// Reads a JSON config from the path given as first argument. Missing keys fall back to their
/// defaults.
fn load_config() -> Result<ChatConfig> {
    let Some(path) = env::args().nth(1) else {
        return Ok(ChatConfig::default());
    };

    let json = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))
}

fn connect(server: &LoopbackServer, name: &str, session_id: &str, config: &ChatConfig) -> Chat {
    Chat::builder()
        .set_transport(server.connect(session_id))
        .set_user(UserProfile::new(name, "", SessionId::from(session_id)))
        .set_config(config.clone())
        .build()
}

fn print_conversation(title: &str, chat: &Chat) {
    let state = chat.state();

    println!("\n{title}");
    for entry in state.messages() {
        let message = &entry.message;
        let reply = message
            .reply_to
            .as_ref()
            .map(|reply| format!(" (re {}: \"{}\")", reply.sender, reply.text))
            .unwrap_or_default();
        let reactions = message
            .reactions
            .iter()
            .map(|emoji| emoji.as_ref())
            .collect::<Vec<_>>()
            .join("");

        println!(
            "  [{}] {} <{:?}> {}{} {}",
            message.timestamp.format("%H:%M:%S"),
            message.sender.name,
            entry.delivery,
            message.text,
            reply,
            reactions
        );
    }

    let online = state
        .online_users()
        .into_iter()
        .map(|user| user.name.as_str())
        .collect::<Vec<_>>();
    let typing = state
        .typing_users()
        .into_iter()
        .map(|user| user.name.as_str())
        .collect::<Vec<_>>();
    println!("  online: {:?}, typing: {:?}", online, typing);
}

#[tokio::main]
async fn main() -> Result<()> {
    enable_debug_logging(Level::INFO);

    let config = load_config()?;
    let server = LoopbackServer::default();

    let jane = connect(&server, "Jane Doe", "session-jane", &config);
    let john = connect(&server, "John Doe", "session-john", &config);

    let _timers = [jane.run_timers(), john.run_timers()];
    let _subscription = john.subscribe(|change: &StateChange| {
        println!("john: revision {} {:?}", change.revision, change.events);
    });

    jane.conversation.set_typing(true);
    print_conversation("John sees Jane typing", &john);

    jane.conversation.send_text("Hello John, see https://example.org").await?;
    let hello_id = john
        .state()
        .messages()
        .last()
        .map(|entry| entry.message.id.clone())
        .context("Jane's message didn't arrive")?;

    john.conversation.send_reply("Hi Jane!", &hello_id).await?;
    john.conversation.add_reaction(&hello_id, "👋".into()).await?;

    server.fail_sends(true);
    let failed_id = jane.conversation.send_text("Are you there?").await?;
    print_conversation("Jane after a failed send", &jane);

    server.fail_sends(false);
    jane.conversation.retry_send(&failed_id).await?;

    let typo_id = jane
        .conversation
        .send_text("Lets grab lunhc")
        .await
        .map(|_| jane.state().messages().last().map(|entry| entry.message.id.clone()))?
        .context("Jane's message didn't arrive")?;
    jane.conversation.delete_message(&typo_id).await?;

    print_conversation("Jane", &jane);
    print_conversation("John", &john);

    jane.shutdown();
    john.shutdown();

    Ok(())
}
