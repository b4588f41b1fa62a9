//! Per-chat echo mode (`/scream` and `/whisper`).

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::ChatId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EchoMode {
    /// Plain messages are copied back unchanged.
    #[default]
    Normal,
    /// Plain text messages are echoed upper-cased.
    Screaming,
}

impl EchoMode {
    /// Text to send back for a plain message, or `None` when the message should
    /// be copied verbatim.
    pub fn transform(self, text: &str) -> Option<String> {
        match self {
            EchoMode::Normal => None,
            EchoMode::Screaming => Some(text.to_uppercase()),
        }
    }
}

/// In-memory mode per chat. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct ChatModes {
    inner: RwLock<HashMap<ChatId, EchoMode>>,
}

impl ChatModes {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat_id: ChatId) -> EchoMode {
        self.inner
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, chat_id: ChatId, mode: EchoMode) {
        let mut map = self.inner.write().await;
        if mode == EchoMode::Normal {
            map.remove(&chat_id);
        } else {
            map.insert(chat_id, mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_to_normal_and_is_per_chat() {
        let modes = ChatModes::new();
        assert_eq!(modes.get(ChatId(1)).await, EchoMode::Normal);

        modes.set(ChatId(1), EchoMode::Screaming).await;
        assert_eq!(modes.get(ChatId(1)).await, EchoMode::Screaming);
        assert_eq!(modes.get(ChatId(2)).await, EchoMode::Normal);

        modes.set(ChatId(1), EchoMode::Normal).await;
        assert_eq!(modes.get(ChatId(1)).await, EchoMode::Normal);
    }

    #[test]
    fn screaming_uppercases_unicode() {
        assert_eq!(EchoMode::Normal.transform("hi"), None);
        assert_eq!(
            EchoMode::Screaming.transform("straße ok"),
            Some("STRASSE OK".to_string())
        );
    }
}
