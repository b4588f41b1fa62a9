//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - parses the update (command, text, callback, other media)
//! - calls into the `urlscan-core` scan pipeline or echo mode
//! - records an audit event when auditing is enabled (best-effort)

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use urlscan_core::{
    scanner::ScanOutcome,
    utils::{best_effort, AuditEvent},
};

use crate::router::AppState;

mod callback;
mod commands;
mod menu;
mod text;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let first_name = msg
        .from()
        .map(|u| u.first_name.as_str())
        .unwrap_or("someone");
    tracing::info!("{first_name} wrote {}", msg.text().unwrap_or(""));

    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(bot, msg, state).await;
        }

        // Sequentialize text messages per chat so reports do not interleave.
        let _guard = state.chat_locks.lock_chat(chat_id).await;
        return text::handle_text(bot, msg, state).await;
    }

    // Photos, stickers, documents, ...: echo back unchanged.
    bot.copy_message(msg.chat.id, msg.chat.id, msg.id).await?;
    Ok(())
}

/// Sender identity used for audit events.
pub(crate) fn sender(msg: &Message) -> (i64, String) {
    let Some(user) = msg.from() else {
        return (0, "unknown".to_string());
    };
    let username = user
        .username
        .clone()
        .unwrap_or_else(|| "unknown".to_string());
    (user.id.0 as i64, username)
}

pub(crate) fn audit_message(state: &AppState, msg: &Message, message_type: &str, content: &str) {
    let Some(audit) = &state.audit else {
        return;
    };
    let (user_id, username) = sender(msg);
    best_effort(
        "audit write",
        audit.write(AuditEvent::message(user_id, &username, message_type, content)),
    );
}

pub(crate) fn audit_outcomes(state: &AppState, msg: &Message, outcomes: &[ScanOutcome]) {
    let Some(audit) = &state.audit else {
        return;
    };
    let (user_id, username) = sender(msg);
    for o in outcomes {
        let event = if o.delivered {
            AuditEvent::scan(user_id, &username, &o.url, &o.verdict)
        } else {
            AuditEvent::error(user_id, &username, "report not delivered", Some(&o.url))
        };
        best_effort("audit write", audit.write(event));
    }
}
