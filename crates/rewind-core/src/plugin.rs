//! Plugin surface: manifest, config and the user-message hook.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::command::{Command, MsgSignal, ParsedCommand};
use crate::error::RewindError;
use crate::model::{ChatMessage, DEFAULT_BOT_SENDER_ID};
use crate::notify::Notifier;
use crate::rewind::{RewindOutcome, Rewinder};
use crate::store::MessageStore;

/// Static description a host shows in its plugin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginManifest {
    pub name: &'static str,
    pub module_name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

pub const MANIFEST: PluginManifest = PluginManifest {
    name: "message-traceback",
    module_name: "rewind_message_traceback",
    description: "Rewind chat history with the /traceback or /tb command",
    version: env!("CARGO_PKG_VERSION"),
    url: env!("CARGO_PKG_REPOSITORY"),
};

/// Host-supplied plugin settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Sender id that marks bot-authored messages in the store.
    pub bot_sender_id: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            bot_sender_id: DEFAULT_BOT_SENDER_ID.to_owned(),
        }
    }
}

/// The traceback plugin as mounted in a host.
#[derive(Debug)]
pub struct TracebackPlugin<S, N> {
    rewinder: Rewinder<S, N>,
}

impl<S: MessageStore, N: Notifier> TracebackPlugin<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: PluginConfig) -> Self {
        Self {
            rewinder: Rewinder::new(store, notifier, config.bot_sender_id),
        }
    }

    /// Hook the host calls for every user message.
    ///
    /// Non-commands and unknown commands return [`MsgSignal::Continue`]
    /// without touching the store. A known command always consumes the
    /// message; if it fails the error is logged and the user hears nothing.
    pub async fn on_user_message(&self, msg: &ChatMessage) -> MsgSignal {
        let Some(parsed) = ParsedCommand::parse(&msg.content_text) else {
            return MsgSignal::Continue;
        };
        let Some(command) = parsed.lookup() else {
            debug!(command = %parsed.name, "unknown command; passing through");
            return MsgSignal::Continue;
        };

        match self.execute(command, msg, &parsed.args).await {
            Ok(outcome) => {
                info!(%command, chat_key = %msg.chat_key, deleted = outcome.deleted(), "command succeeded")
            }
            Err(e) => error!(%command, chat_key = %msg.chat_key, error = %e, "command failed"),
        }
        MsgSignal::BlockAll
    }

    async fn execute(
        &self,
        command: Command,
        msg: &ChatMessage,
        args: &str,
    ) -> Result<RewindOutcome, RewindError> {
        match command {
            Command::Traceback => {
                info!(args, "running message traceback");
                self.rewinder.rewind(&msg.chat_key, msg.send_timestamp).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, StoredMessage};
    use crate::notify::MemoryNotifier;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    const CHAT: &str = "private_7";

    fn plugin(
        store: &Arc<MemoryStore>,
        notifier: &Arc<MemoryNotifier>,
    ) -> TracebackPlugin<MemoryStore, MemoryNotifier> {
        TracebackPlugin::new(Arc::clone(store), Arc::clone(notifier), PluginConfig::default())
    }

    /// Store that counts calls and fails every one of them.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail<T>(&self) -> Result<T, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::Protocol("disk on fire".to_owned()))
        }
    }

    impl MessageStore for BrokenStore {
        async fn append_message(&self, _: &ChatMessage) -> Result<StoredMessage, sqlx::Error> {
            self.fail()
        }
        async fn recent_messages_from(
            &self,
            _: &str,
            _: &str,
            _: i64,
            _: u32,
        ) -> Result<Vec<StoredMessage>, sqlx::Error> {
            self.fail()
        }
        async fn messages_between(
            &self,
            _: &str,
            _: Position,
            _: i64,
        ) -> Result<Vec<StoredMessage>, sqlx::Error> {
            self.fail()
        }
        async fn list_messages(&self, _: &str) -> Result<Vec<StoredMessage>, sqlx::Error> {
            self.fail()
        }
        async fn delete_message(&self, _: i64) -> Result<bool, sqlx::Error> {
            self.fail()
        }
    }

    #[tokio::test]
    async fn ordinary_text_passes_through() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let msg = ChatMessage::new(CHAT, "1", 1, "hello");

        assert_eq!(plugin(&store, &notifier).on_user_message(&msg).await, MsgSignal::Continue);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_never_touches_the_store() {
        let store = Arc::new(BrokenStore::default());
        let notifier = Arc::new(MemoryNotifier::new());
        let plugin = TracebackPlugin::new(Arc::clone(&store), Arc::clone(&notifier), PluginConfig::default());

        let signal = plugin.on_user_message(&ChatMessage::new(CHAT, "1", 1, "/foo bar")).await;

        assert_eq!(signal, MsgSignal::Continue);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn alias_runs_the_rewind() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        for (sender, ts, text) in [("-1", 10, "Hello there"), ("-1", 20, "Sure, doing X"), ("1", 30, "/TB")] {
            store.append_message(&ChatMessage::new(CHAT, sender, ts, text)).await.unwrap();
        }

        let signal = plugin(&store, &notifier)
            .on_user_message(&ChatMessage::new(CHAT, "1", 30, "/TB"))
            .await;

        assert_eq!(signal, MsgSignal::BlockAll);
        assert_eq!(store.list_messages(CHAT).await.unwrap().len(), 1);
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn failing_command_is_swallowed_and_logged() {
        let store = Arc::new(BrokenStore::default());
        let notifier = Arc::new(MemoryNotifier::new());
        let plugin = TracebackPlugin::new(Arc::clone(&store), Arc::clone(&notifier), PluginConfig::default());

        let signal = plugin
            .on_user_message(&ChatMessage::new(CHAT, "1", 5, "/traceback please"))
            .await;

        assert_eq!(signal, MsgSignal::BlockAll);
        assert!(notifier.sent().is_empty());
        assert!(logs_contain("command failed"));
        assert!(logs_contain("disk on fire"));
    }

    #[tokio::test]
    async fn custom_bot_sender_id_is_honoured() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        for (sender, ts) in [("bot", 10), ("bot", 20), ("-1", 25)] {
            store.append_message(&ChatMessage::new(CHAT, sender, ts, "x")).await.unwrap();
        }
        let config = PluginConfig { bot_sender_id: "bot".to_owned() };
        let plugin = TracebackPlugin::new(Arc::clone(&store), Arc::clone(&notifier), config);

        plugin.on_user_message(&ChatMessage::new(CHAT, "1", 30, "/tb")).await;

        let left: Vec<_> = store
            .list_messages(CHAT)
            .await
            .unwrap()
            .iter()
            .map(|m| m.send_timestamp)
            .collect();
        assert_eq!(left, [10]);
    }

    #[test]
    fn config_defaults_to_bot_sentinel() {
        let config: PluginConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.bot_sender_id, "-1");
    }

    #[test]
    fn manifest_serializes() {
        let json = serde_json::to_value(MANIFEST).unwrap();
        assert_eq!(json["module_name"], "rewind_message_traceback");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
