use std::{collections::HashMap, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, error_handlers::LoggingErrorHandler, prelude::*};

use tokio::sync::{Mutex, OwnedMutexGuard};

use urlscan_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use urlscan_core::{
    config::Config, messaging::port::MessagingPort, mode::ChatModes, ports::SafetyChecker,
    scanner::UrlScanner, utils::AuditLogger,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub messenger: Arc<dyn MessagingPort>,
    pub scanner: UrlScanner,
    pub modes: Arc<ChatModes>,
    pub chat_locks: Arc<ChatLocks>,
    pub audit: Option<Arc<AuditLogger>>,
}

#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

pub async fn run_polling(
    cfg: Arc<Config>,
    checker: Arc<dyn SafetyChecker>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!("URL Scanner Bot started: @{}", me.username()),
        Err(e) => tracing::warn!("get_me failed: {e}"),
    }
    if let Some(path) = &cfg.audit_log_path {
        tracing::info!("audit log: {}", path.display());
    }
    if cfg.threat_api.is_configured() {
        tracing::info!("threat api: live ({:?} timeout)", cfg.threat_api.timeout);
    } else {
        tracing::warn!("threat api not configured; serving mock responses");
    }

    // Multi-URL messages produce bursts of reports; keep them under Telegram's limits.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let state = Arc::new(AppState {
        messenger,
        scanner: UrlScanner::new(checker),
        modes: Arc::new(ChatModes::new()),
        chat_locks: Arc::new(ChatLocks::default()),
        audit: AuditLogger::from_config(&cfg).map(Arc::new),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .error_handler(LoggingErrorHandler::with_custom_text("Bot error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[tokio::test]
    async fn chat_locks_serialize_same_chat_only() {
        let locks = ChatLocks::default();

        let guard = locks.lock_chat(1).await;

        // Another chat is independent.
        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(2)).await;
        assert!(other.is_ok());

        // Same chat waits until the first guard is dropped.
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(1)).await;
        assert!(same.is_err());

        drop(guard);
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock_chat(1)).await;
        assert!(same.is_ok());
    }
}
