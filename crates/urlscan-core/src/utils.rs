use std::{
    fmt::Display,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{config::Config, errors::Error, formatting::truncate_chars, Result};

// ============== Timestamp Helpers ==============

/// RFC3339 timestamp in UTC (for logs/telemetry).
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

// ============== Best-effort Operations ==============

/// Consume the result of an operation whose failure must not affect the caller
/// (deleting a status message, writing an audit line). Failures are logged.
pub fn best_effort<T, E: Display>(what: &str, result: std::result::Result<T, E>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("best-effort {what} failed: {e}");
            None
        }
    }
}

// ============== Audit Logging ==============

const AUDIT_MAX_TEXT: usize = 500;

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AuditEvent {
    fn base(event: &str, user_id: i64, username: &str) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            user_id: Some(user_id),
            username: Some(username.to_string()),
            message_type: None,
            content: None,
            url: None,
            verdict: None,
            error: None,
            context: None,
        }
    }

    pub fn message(user_id: i64, username: &str, message_type: &str, content: &str) -> Self {
        Self {
            message_type: Some(message_type.to_string()),
            content: Some(content.to_string()),
            ..Self::base("message", user_id, username)
        }
    }

    /// One URL verdict (`safe`, `dangerous`, `unknown`, or `error`).
    pub fn scan(user_id: i64, username: &str, url: &str, verdict: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            verdict: Some(verdict.to_string()),
            ..Self::base("scan", user_id, username)
        }
    }

    pub fn error(user_id: i64, username: &str, error: &str, context: Option<&str>) -> Self {
        Self {
            error: Some(error.to_string()),
            context: context.map(|s| s.to_string()),
            ..Self::base("error", user_id, username)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    /// `None` unless `AUDIT_LOG_PATH` was set.
    pub fn from_config(cfg: &Config) -> Option<Self> {
        cfg.audit_log_path
            .as_ref()
            .map(|path| Self::new(path.clone(), cfg.audit_log_json))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        for field in [&mut event.content, &mut event.url, &mut event.error] {
            if let Some(s) = field.as_mut() {
                *s = truncate_chars(s, AUDIT_MAX_TEXT);
            }
        }

        let mut opts = OpenOptions::new();
        opts.create(true).append(true);
        // Entries carry user ids and message text.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }
        let mut file = opts.open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        // Plain text format for readability.
        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            match v {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("{prefix}-{pid}-{ts}.log"))
    }

    #[test]
    fn audit_truncates_content() {
        let log = AuditLogger::new(tmp_file("urlscan-audit-test"), true);
        let content = "x".repeat(AUDIT_MAX_TEXT + 1);
        log.write(AuditEvent::message(1, "u", "TEXT", &content))
            .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
        let stored = v["content"].as_str().unwrap();
        assert!(stored.ends_with("..."));
        assert_eq!(stored.len(), AUDIT_MAX_TEXT + 3);

        let _ = std::fs::remove_file(log.path());
    }

    #[test]
    fn audit_plain_text_lists_fields() {
        let log = AuditLogger::new(tmp_file("urlscan-audit-plain"), false);
        log.write(AuditEvent::scan(7, "alice", "https://a.co", "dangerous"))
            .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert!(written.contains("event: scan"));
        assert!(written.contains("url: https://a.co"));
        assert!(written.contains("verdict: dangerous"));
        assert!(written.contains("user_id: 7"));
        assert!(!written.contains("error:"));

        let _ = std::fs::remove_file(log.path());
    }

    fn config_with_audit(path: Option<PathBuf>) -> Config {
        Config {
            telegram_bot_token: "t".to_string(),
            threat_api: crate::config::ThreatApiConfig::default(),
            audit_log_path: path,
            audit_log_json: true,
        }
    }

    #[test]
    fn audit_is_off_without_a_path() {
        assert!(AuditLogger::from_config(&config_with_audit(None)).is_none());

        let path = tmp_file("urlscan-audit-opt-in");
        let log = AuditLogger::from_config(&config_with_audit(Some(path.clone())))
            .expect("audit enabled");
        assert_eq!(log.path(), path.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn audit_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let log = AuditLogger::new(tmp_file("urlscan-audit-mode"), false);
        log.write(AuditEvent::scan(1, "u", "https://a.co", "safe"))
            .unwrap();

        let mode = std::fs::metadata(log.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);

        let _ = std::fs::remove_file(log.path());
    }

    #[test]
    fn best_effort_swallows_errors() {
        let ok: std::result::Result<u8, String> = Ok(3);
        assert_eq!(best_effort("noop", ok), Some(3));

        let err: std::result::Result<u8, String> = Err("boom".to_string());
        assert_eq!(best_effort("noop", err), None);
    }
}
