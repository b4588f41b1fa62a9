use std::sync::Arc;

use teloxide::prelude::*;

use urlscan_core::{
    domain::{ChatId, MessageId, MessageRef},
    utils::best_effort,
};

use crate::handlers::menu;
use crate::router::AppState;

pub async fn handle_callback(
    _bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();

    // Always answer the callback so the client stops its spinner.
    best_effort(
        "answer callback",
        state.messenger.answer_callback_query(&q.id, None).await,
    );

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let Some((text, keyboard)) = menu::page_for(&data) else {
        tracing::debug!("ignoring callback data {data:?}");
        return Ok(());
    };

    let target = MessageRef {
        chat_id: ChatId(message.chat.id.0),
        message_id: MessageId(message.id.0),
    };
    if let Err(e) = state
        .messenger
        .edit_inline_keyboard(target, text, keyboard)
        .await
    {
        tracing::warn!("menu edit failed: {e}");
    }

    Ok(())
}
