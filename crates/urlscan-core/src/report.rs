//! Human-readable safety reports (Telegram HTML).
//!
//! Section order and fallback strings are part of the bot's visible output and
//! must stay byte-for-byte stable.

use crate::{
    formatting::escape_html,
    safety::{SafetyCheckResult, SafetyData},
};

/// Verdict selected for a successful check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Dangerous,
    Safe,
    Unknown,
}

impl Verdict {
    /// `is_safe == false` or `threat_level == "high"` wins over `is_safe == true`.
    pub fn classify(data: &SafetyData) -> Self {
        if data.is_safe == Some(false) || data.threat_level.as_deref() == Some("high") {
            Verdict::Dangerous
        } else if data.is_safe == Some(true) {
            Verdict::Safe
        } else {
            Verdict::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Dangerous => "dangerous",
            Verdict::Safe => "safe",
            Verdict::Unknown => "unknown",
        }
    }
}

/// Render the report for one checked URL. Never returns an empty string.
pub fn format_safety_report(url: &str, result: &SafetyCheckResult) -> String {
    let url = escape_html(url);

    let data = match result {
        SafetyCheckResult::Failure { message, .. } => {
            return format!(
                "❌ <b>Error checking URL:</b> {url}\n\n🔍 <b>Error:</b> {}",
                escape_html(message)
            );
        }
        SafetyCheckResult::Success { data } => data,
    };

    let mut report = String::from("🔍 <b>URL Safety Report</b>\n\n");
    report.push_str(&format!("🌐 <b>URL:</b> {url}\n\n"));

    match Verdict::classify(data) {
        Verdict::Dangerous => {
            report.push_str("🚨 <b>Status:</b> SUSPICIOUS/DANGEROUS\n");
            report.push_str(&format!(
                "⚠️ <b>Risk Level:</b> {}\n",
                or_fallback(data.threat_level.as_deref(), "Unknown")
            ));
            let categories = data.categories.as_ref().map(|c| c.join(", "));
            report.push_str(&format!(
                "🏷️ <b>Categories:</b> {}\n",
                or_fallback(categories.as_deref(), "Unknown")
            ));
            if let Some(reason) = &data.reason {
                report.push_str(&format!("📝 <b>Reason:</b> {}\n", escape_html(reason)));
            }
        }
        Verdict::Safe => {
            report.push_str("✅ <b>Status:</b> SAFE\n");
            report.push_str(&format!(
                "🛡️ <b>Risk Level:</b> {}\n",
                or_fallback(data.threat_level.as_deref(), "Low")
            ));
        }
        Verdict::Unknown => {
            report.push_str("❓ <b>Status:</b> UNKNOWN\n");
            report.push_str(&format!(
                "📊 <b>Confidence:</b> {}\n",
                or_fallback(data.confidence.as_deref(), "N/A")
            ));
        }
    }

    if let Some(info) = &data.domain_info {
        report.push_str("\n🌍 <b>Domain Info:</b>\n");
        report.push_str(&format!(
            "📅 Created: {}\n",
            or_fallback(info.created.as_deref(), "Unknown")
        ));
        report.push_str(&format!(
            "🏢 Registrar: {}\n",
            or_fallback(info.registrar.as_deref(), "Unknown")
        ));
    }

    if let Some(extra) = &data.additional_info {
        report.push_str(&format!(
            "\n📋 <b>Additional Info:</b> {}\n",
            escape_html(extra)
        ));
    }

    report
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::{DomainInfo, StatusHint};

    const URL: &str = "https://example.com";

    fn success(data: SafetyData) -> SafetyCheckResult {
        SafetyCheckResult::Success { data }
    }

    fn has_status_line(report: &str) -> bool {
        report.contains("SAFE") || report.contains("DANGEROUS") || report.contains("UNKNOWN")
    }

    #[test]
    fn failure_is_two_line_error() {
        let r = SafetyCheckResult::failure("timeout", StatusHint::Unknown);
        let report = format_safety_report(URL, &r);
        assert_eq!(
            report,
            "❌ <b>Error checking URL:</b> https://example.com\n\n🔍 <b>Error:</b> timeout"
        );
        assert!(!has_status_line(&report));
    }

    #[test]
    fn dangerous_branch_lists_categories() {
        let data = SafetyData {
            is_safe: Some(false),
            threat_level: Some("high".to_string()),
            categories: Some(vec!["phishing".to_string()]),
            ..SafetyData::default()
        };
        let report = format_safety_report(URL, &success(data));
        assert_eq!(
            report,
            "🔍 <b>URL Safety Report</b>\n\n\
🌐 <b>URL:</b> https://example.com\n\n\
🚨 <b>Status:</b> SUSPICIOUS/DANGEROUS\n\
⚠️ <b>Risk Level:</b> high\n\
🏷️ <b>Categories:</b> phishing\n"
        );
    }

    #[test]
    fn high_threat_wins_over_is_safe_true() {
        let data = SafetyData {
            is_safe: Some(true),
            threat_level: Some("high".to_string()),
            reason: Some("typosquat".to_string()),
            ..SafetyData::default()
        };
        let report = format_safety_report(URL, &success(data));
        assert!(report.contains("🚨 <b>Status:</b> SUSPICIOUS/DANGEROUS\n"));
        assert!(report.contains("🏷️ <b>Categories:</b> Unknown\n"));
        assert!(report.contains("📝 <b>Reason:</b> typosquat\n"));
    }

    #[test]
    fn dangerous_without_level_falls_back() {
        let data = SafetyData {
            is_safe: Some(false),
            categories: Some(vec!["scam".to_string(), "spam".to_string()]),
            ..SafetyData::default()
        };
        let report = format_safety_report(URL, &success(data));
        assert!(report.contains("⚠️ <b>Risk Level:</b> Unknown\n"));
        assert!(report.contains("🏷️ <b>Categories:</b> scam, spam\n"));
        assert!(!report.contains("Reason"));
    }

    #[test]
    fn safe_branch_defaults_to_low() {
        let data = SafetyData {
            is_safe: Some(true),
            ..SafetyData::default()
        };
        let report = format_safety_report(URL, &success(data));
        assert!(report.ends_with("✅ <b>Status:</b> SAFE\n🛡️ <b>Risk Level:</b> Low\n"));
    }

    #[test]
    fn empty_payload_is_unknown_without_extra_blocks() {
        let report = format_safety_report(URL, &success(SafetyData::default()));
        assert_eq!(
            report,
            "🔍 <b>URL Safety Report</b>\n\n\
🌐 <b>URL:</b> https://example.com\n\n\
❓ <b>Status:</b> UNKNOWN\n\
📊 <b>Confidence:</b> N/A\n"
        );
    }

    #[test]
    fn domain_and_additional_info_follow_any_branch() {
        const TAIL: &str = "\n🌍 <b>Domain Info:</b>\n\
📅 Created: Unknown\n\
🏢 Registrar: Gandi\n\
\n📋 <b>Additional Info:</b> First seen today\n";

        let with_extras = |data: SafetyData| SafetyData {
            domain_info: Some(DomainInfo {
                created: None,
                registrar: Some("Gandi".to_string()),
            }),
            additional_info: Some("First seen today".to_string()),
            ..data
        };

        let cases = [
            (
                SafetyData {
                    is_safe: Some(false),
                    reason: Some("Lookalike domain".to_string()),
                    ..SafetyData::default()
                },
                "🚨 <b>Status:</b> SUSPICIOUS/DANGEROUS\n\
⚠️ <b>Risk Level:</b> Unknown\n\
🏷️ <b>Categories:</b> Unknown\n\
📝 <b>Reason:</b> Lookalike domain\n",
            ),
            (
                SafetyData {
                    is_safe: Some(true),
                    threat_level: Some("low".to_string()),
                    ..SafetyData::default()
                },
                "✅ <b>Status:</b> SAFE\n🛡️ <b>Risk Level:</b> low\n",
            ),
            (
                SafetyData {
                    confidence: Some("0.4".to_string()),
                    ..SafetyData::default()
                },
                "❓ <b>Status:</b> UNKNOWN\n📊 <b>Confidence:</b> 0.4\n",
            ),
        ];

        for (data, section) in cases {
            let report = format_safety_report(URL, &success(with_extras(data)));
            let expected = format!(
                "🔍 <b>URL Safety Report</b>\n\n🌐 <b>URL:</b> https://example.com\n\n{section}{TAIL}"
            );
            assert_eq!(report, expected);
        }
    }

    #[test]
    fn markup_in_values_is_escaped() {
        let data = SafetyData {
            is_safe: Some(false),
            reason: Some("<script>".to_string()),
            ..SafetyData::default()
        };
        let report = format_safety_report("https://a.co/?x=1&y=2", &success(data));
        assert!(report.contains("https://a.co/?x=1&amp;y=2"));
        assert!(report.contains("&lt;script&gt;"));
    }

    #[test]
    fn formatting_is_idempotent() {
        let r = success(SafetyData::mock());
        assert_eq!(format_safety_report(URL, &r), format_safety_report(URL, &r));
    }

    #[test]
    fn classify_priorities() {
        let mut d = SafetyData::default();
        assert_eq!(Verdict::classify(&d), Verdict::Unknown);
        d.is_safe = Some(true);
        assert_eq!(Verdict::classify(&d), Verdict::Safe);
        d.threat_level = Some("high".to_string());
        assert_eq!(Verdict::classify(&d), Verdict::Dangerous);
        d.threat_level = Some("HIGH".to_string());
        assert_eq!(Verdict::classify(&d), Verdict::Safe);
    }
}
