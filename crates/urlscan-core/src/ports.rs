use async_trait::async_trait;

use crate::safety::SafetyCheckResult;

/// Hexagonal port for the URL classification backend.
///
/// Implementations never return an error: transport problems are folded into
/// [`SafetyCheckResult::Failure`] so one bad URL cannot abort a batch.
#[async_trait]
pub trait SafetyChecker: Send + Sync {
    async fn check_url(&self, url: &str) -> SafetyCheckResult;
}
