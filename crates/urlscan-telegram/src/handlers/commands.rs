use std::sync::Arc;

use teloxide::prelude::*;

use urlscan_core::{
    domain::ChatId, extract::extract_urls, mode::EchoMode, scanner::ScanOutcome,
    utils::best_effort,
};

use crate::handlers::{audit_message, audit_outcomes, menu};
use crate::router::AppState;

const WELCOME_TEXT: &str = "
🛡️ <b>Welcome to URL Scanner Bot!</b>

I help you check if URLs are safe or potentially dangerous/scam links.

<b>How to use:</b>
• Just send me any message with URLs and I'll scan them automatically
• Use /check [url] for manual checking
• Use /help for more information

Stay safe online! 🔒
";

const HELP_TEXT: &str = "
🤖 <b>URL Scanner Bot</b>

<b>Commands:</b>
/start - Start the bot
/help - Show this help message
/check [url] - Check a specific URL for safety
/menu - Show navigation menu

<b>Auto-checking:</b>
Just send me any message containing URLs and I'll automatically scan them for you!

<b>Features:</b>
🔍 Automatic URL detection
🛡️ Scam/phishing detection
⚡ Real-time scanning
📊 Detailed safety reports

<b>Example:</b>
Send: \"Check this link: https://example.com\"
Or use: /check https://example.com
";

const CHECK_USAGE: &str =
    "❌ Please provide a valid URL to check.\n\nExample: /check https://example.com";

const CHECK_STATUS: &str = "🔄 Scanning URL for threats...";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// `/check` body. Replies with usage and returns `None` when `arg` has no URL.
async fn check_urls(state: &AppState, chat_id: ChatId, arg: &str) -> Option<Vec<ScanOutcome>> {
    let urls = extract_urls(arg);
    if urls.is_empty() {
        best_effort(
            "check usage reply",
            state.messenger.send_text(chat_id, CHECK_USAGE).await,
        );
        return None;
    }

    let _guard = state.chat_locks.lock_chat(chat_id.0).await;
    let outcomes = state
        .scanner
        .scan_with_status(state.messenger.as_ref(), chat_id, CHECK_STATUS, &urls)
        .await;
    Some(outcomes)
}

pub async fn handle_command(_bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let (cmd, arg) = parse_command(text);

    match cmd.as_str() {
        "start" => {
            best_effort(
                "start reply",
                state.messenger.send_html(chat_id, WELCOME_TEXT).await,
            );
            Ok(())
        }

        "help" => {
            best_effort(
                "help reply",
                state.messenger.send_html(chat_id, HELP_TEXT).await,
            );
            Ok(())
        }

        "check" => {
            if let Some(outcomes) = check_urls(&state, chat_id, &arg).await {
                audit_message(&state, &msg, "CHECK", text);
                audit_outcomes(&state, &msg, &outcomes);
            }
            Ok(())
        }

        "menu" => {
            best_effort(
                "menu reply",
                state
                    .messenger
                    .send_inline_keyboard(chat_id, menu::FIRST_MENU, menu::first_menu_markup())
                    .await,
            );
            Ok(())
        }

        "scream" => {
            state.modes.set(chat_id, EchoMode::Screaming).await;
            Ok(())
        }

        "whisper" => {
            state.modes.set(chat_id, EchoMode::Normal).await;
            Ok(())
        }

        _ => {
            tracing::debug!("ignoring unknown command /{cmd}");
            Ok(())
        }
    }
}
