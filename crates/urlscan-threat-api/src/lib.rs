//! Threat assessment API adapter.
//!
//! Posts `{"url": ...}` to the configured endpoint with a bearer token and maps
//! the reply into a [`SafetyCheckResult`]. Without an endpoint and key the
//! client answers every check with the fixed mock payload.

use async_trait::async_trait;

use urlscan_core::{
    config::ThreatApiConfig,
    errors::Error,
    ports::SafetyChecker,
    safety::{SafetyCheckResult, SafetyData, StatusHint},
    Result,
};

#[derive(Clone, Debug)]
struct Endpoint {
    url: String,
    api_key: String,
}

#[derive(Clone, Debug)]
pub struct ThreatApiClient {
    endpoint: Option<Endpoint>,
    timeout_ms: u128,
    http: reqwest::Client,
}

impl ThreatApiClient {
    pub fn new(cfg: &ThreatApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::External(format!("threat api client build error: {e}")))?;

        let endpoint = match (&cfg.endpoint, &cfg.api_key) {
            (Some(url), Some(api_key)) => Some(Endpoint {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            endpoint,
            timeout_ms: cfg.timeout.as_millis(),
            http,
        })
    }

    pub fn is_mock(&self) -> bool {
        self.endpoint.is_none()
    }

    /// Classify one URL. Never fails: errors come back as `Failure`.
    pub async fn check_url_safety(&self, url: &str) -> SafetyCheckResult {
        let Some(endpoint) = &self.endpoint else {
            return SafetyCheckResult::mock();
        };

        match self.post(endpoint, url).await {
            Ok(data) => SafetyCheckResult::Success { data },
            Err((message, status)) => {
                tracing::error!("threat api error: {message}");
                SafetyCheckResult::failure(message, status)
            }
        }
    }

    async fn post(
        &self,
        endpoint: &Endpoint,
        url: &str,
    ) -> std::result::Result<SafetyData, (String, StatusHint)> {
        let resp = self
            .http
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err((
                format!("Request failed with status code {}", status.as_u16()),
                StatusHint::Code(status.as_u16()),
            ));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.transport_failure(e))?;

        // Schema-less: a body that is not JSON at all still counts as an answer.
        let data = match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(v) => SafetyData::from_value(&v),
            Err(e) => {
                tracing::debug!("threat api returned non-JSON body: {e}");
                SafetyData::default()
            }
        };
        Ok(data)
    }

    fn transport_failure(&self, e: reqwest::Error) -> (String, StatusHint) {
        let status = e
            .status()
            .map(|s| StatusHint::Code(s.as_u16()))
            .unwrap_or(StatusHint::Unknown);
        let message = if e.is_timeout() {
            format!("timeout of {}ms exceeded", self.timeout_ms)
        } else {
            e.to_string()
        };
        (message, status)
    }
}

#[async_trait]
impl SafetyChecker for ThreatApiClient {
    async fn check_url(&self, url: &str) -> SafetyCheckResult {
        self.check_url_safety(url).await
    }
}
