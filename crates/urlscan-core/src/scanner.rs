//! The extract → check → report pipeline.

use std::sync::Arc;

use crate::{
    domain::ChatId,
    messaging::port::MessagingPort,
    ports::SafetyChecker,
    report::{format_safety_report, Verdict},
    safety::SafetyCheckResult,
    utils::best_effort,
};

/// Per-URL outcome of a scan, for audit logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    pub url: String,
    pub verdict: String,
    pub delivered: bool,
}

/// Runs safety checks and delivers reports to a chat.
#[derive(Clone)]
pub struct UrlScanner {
    checker: Arc<dyn SafetyChecker>,
}

impl UrlScanner {
    pub fn new(checker: Arc<dyn SafetyChecker>) -> Self {
        Self { checker }
    }

    /// Check one URL and render its report.
    pub async fn check_and_format(&self, url: &str) -> (SafetyCheckResult, String) {
        let result = self.checker.check_url(url).await;
        let report = format_safety_report(url, &result);
        (result, report)
    }

    /// Check `urls` one after another, sending a report for each.
    ///
    /// A URL whose report cannot be delivered gets a plain-text fallback and the
    /// remaining URLs are still processed.
    pub async fn scan_to_chat(
        &self,
        messenger: &dyn MessagingPort,
        chat_id: ChatId,
        urls: &[String],
    ) -> Vec<ScanOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls {
            let (result, report) = self.check_and_format(url).await;
            let verdict = match &result {
                SafetyCheckResult::Success { data } => Verdict::classify(data).as_str(),
                SafetyCheckResult::Failure { message, status } => {
                    tracing::warn!("threat api error for {url}: {message} (status {status})");
                    "error"
                }
            };

            let delivered = match messenger.send_html(chat_id, &report).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("failed to deliver report for {url}: {e}");
                    let fallback = format!("❌ Failed to check {url}: {e}");
                    best_effort("fallback reply", messenger.send_text(chat_id, &fallback).await);
                    false
                }
            };

            outcomes.push(ScanOutcome {
                url: url.clone(),
                verdict: verdict.to_string(),
                delivered,
            });
        }

        outcomes
    }

    /// Post `status`, scan, then remove the status message.
    pub async fn scan_with_status(
        &self,
        messenger: &dyn MessagingPort,
        chat_id: ChatId,
        status: &str,
        urls: &[String],
    ) -> Vec<ScanOutcome> {
        let status_msg = best_effort("status message", messenger.send_text(chat_id, status).await);

        let outcomes = self.scan_to_chat(messenger, chat_id, urls).await;

        if let Some(msg) = status_msg {
            best_effort("status cleanup", messenger.delete_message(msg).await);
        }

        outcomes
    }
}
