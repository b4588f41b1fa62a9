use std::sync::Arc;

use urlscan_core::{config::Config, ports::SafetyChecker};
use urlscan_threat_api::ThreatApiClient;

#[tokio::main]
async fn main() -> Result<(), urlscan_core::Error> {
    urlscan_core::logging::init("urlscan")?;

    let cfg = Arc::new(Config::load()?);

    let checker: Arc<dyn SafetyChecker> = Arc::new(ThreatApiClient::new(&cfg.threat_api)?);

    urlscan_telegram::router::run_polling(cfg, checker)
        .await
        .map_err(|e| urlscan_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
