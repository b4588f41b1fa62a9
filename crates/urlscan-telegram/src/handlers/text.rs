use std::sync::Arc;

use teloxide::prelude::*;

use urlscan_core::{domain::ChatId, extract::extract_urls, formatting::found_urls_status};

use crate::handlers::{audit_message, audit_outcomes};
use crate::router::AppState;

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);

    let urls = extract_urls(text);
    if !urls.is_empty() {
        audit_message(&state, &msg, "TEXT", text);

        let status = found_urls_status(urls.len());
        let outcomes = state
            .scanner
            .scan_with_status(state.messenger.as_ref(), chat_id, &status, &urls)
            .await;
        audit_outcomes(&state, &msg, &outcomes);
        return Ok(());
    }

    match state.modes.get(chat_id).await.transform(text) {
        Some(loud) => {
            let mut req = bot.send_message(msg.chat.id, loud);
            if let Some(entities) = msg.entities() {
                req = req.entities(entities.to_vec());
            }
            req.await?;
        }
        None => {
            bot.copy_message(msg.chat.id, msg.chat.id, msg.id).await?;
        }
    }

    Ok(())
}
