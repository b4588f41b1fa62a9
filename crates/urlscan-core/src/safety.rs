//! Safety check result model.
//!
//! The threat API has no fixed schema, so [`SafetyData`] is decoded field by
//! field from a raw JSON value: anything missing or of an unexpected type is
//! simply absent. Fallback text is applied later, by the report formatter.

use std::fmt;

use serde_json::Value;

/// Registration details for the checked domain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainInfo {
    pub created: Option<String>,
    pub registrar: Option<String>,
}

/// Risk assessment payload returned by the threat API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafetyData {
    pub is_safe: Option<bool>,
    pub threat_level: Option<String>,
    pub categories: Option<Vec<String>>,
    pub reason: Option<String>,
    pub confidence: Option<String>,
    pub domain_info: Option<DomainInfo>,
    pub additional_info: Option<String>,
}

impl SafetyData {
    /// Decode a response body. Non-object bodies decode to an empty payload.
    pub fn from_value(v: &Value) -> Self {
        let Some(obj) = v.as_object() else {
            return Self::default();
        };

        Self {
            is_safe: obj.get("is_safe").and_then(Value::as_bool),
            threat_level: obj.get("threat_level").and_then(text_field),
            categories: obj.get("categories").and_then(categories_field),
            reason: obj.get("reason").and_then(text_field),
            confidence: obj.get("confidence").and_then(text_field),
            domain_info: obj.get("domain_info").and_then(domain_info_field),
            additional_info: obj.get("additional_info").and_then(text_field),
        }
    }

    /// Fixed payload returned when the threat API is not configured.
    pub fn mock() -> Self {
        Self {
            is_safe: Some(true),
            threat_level: Some("low".to_string()),
            categories: Some(vec!["unknown".to_string()]),
            reason: Some("API not configured - mock response".to_string()),
            ..Self::default()
        }
    }
}

/// HTTP status of a failed check, when a response was received at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusHint {
    Code(u16),
    Unknown,
}

impl fmt::Display for StatusHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusHint::Code(code) => write!(f, "{code}"),
            StatusHint::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Outcome of one URL classification attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SafetyCheckResult {
    Success { data: SafetyData },
    Failure { message: String, status: StatusHint },
}

impl SafetyCheckResult {
    pub fn mock() -> Self {
        SafetyCheckResult::Success {
            data: SafetyData::mock(),
        }
    }

    pub fn failure(message: impl Into<String>, status: StatusHint) -> Self {
        SafetyCheckResult::Failure {
            message: message.into(),
            status,
        }
    }
}

/// Scalar → display text. Empty strings, `false`, `0` and `null` are absent.
fn text_field(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Integral floats print without a fraction (`1.0` → `1`).
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

/// One slot of a joined list: `null` is blank, nested lists join with `,`.
fn list_item_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(list_item_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn categories_field(v: &Value) -> Option<Vec<String>> {
    let items = v.as_array()?;
    // Every element keeps its slot, so `[null, "x"]` joins to `, x`.
    let out: Vec<String> = items.iter().map(list_item_text).collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn domain_info_field(v: &Value) -> Option<DomainInfo> {
    match v {
        Value::Object(obj) => Some(DomainInfo {
            created: obj.get("created").and_then(text_field),
            registrar: obj.get("registrar").and_then(text_field),
        }),
        // Present but unusable: the block is still shown, with fallbacks.
        Value::String(s) if !s.is_empty() => Some(DomainInfo::default()),
        Value::Array(_) => Some(DomainInfo::default()),
        Value::Bool(true) => Some(DomainInfo::default()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(DomainInfo::default()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_payload() {
        let v = json!({
            "is_safe": false,
            "threat_level": "high",
            "categories": ["phishing", "malware"],
            "reason": "Known phishing kit",
            "confidence": 0.97,
            "domain_info": {"created": "2024-01-02", "registrar": "NameCheap"},
            "additional_info": "Reported 3 times"
        });
        let data = SafetyData::from_value(&v);
        assert_eq!(data.is_safe, Some(false));
        assert_eq!(data.threat_level.as_deref(), Some("high"));
        assert_eq!(
            data.categories,
            Some(vec!["phishing".to_string(), "malware".to_string()])
        );
        assert_eq!(data.reason.as_deref(), Some("Known phishing kit"));
        assert_eq!(data.confidence.as_deref(), Some("0.97"));
        assert_eq!(
            data.domain_info,
            Some(DomainInfo {
                created: Some("2024-01-02".to_string()),
                registrar: Some("NameCheap".to_string()),
            })
        );
        assert_eq!(data.additional_info.as_deref(), Some("Reported 3 times"));
    }

    #[test]
    fn wrong_types_become_absent() {
        let v = json!({
            "is_safe": "yes",
            "threat_level": 0,
            "categories": "phishing",
            "reason": "",
            "confidence": null,
            "additional_info": false
        });
        assert_eq!(SafetyData::from_value(&v), SafetyData::default());
    }

    #[test]
    fn non_object_body_is_empty_payload() {
        assert_eq!(SafetyData::from_value(&json!("ok")), SafetyData::default());
        assert_eq!(SafetyData::from_value(&json!([1, 2])), SafetyData::default());
        assert_eq!(SafetyData::from_value(&Value::Null), SafetyData::default());
    }

    #[test]
    fn empty_category_list_is_absent() {
        let data = SafetyData::from_value(&json!({"categories": []}));
        assert_eq!(data.categories, None);
    }

    #[test]
    fn category_slots_are_kept_for_odd_elements() {
        let data = SafetyData::from_value(&json!({"categories": [null, "x", 2, {"a": 1}]}));
        assert_eq!(
            data.categories.map(|c| c.join(", ")).as_deref(),
            Some(", x, 2, [object Object]")
        );
    }

    #[test]
    fn integral_floats_print_without_fraction() {
        let data = SafetyData::from_value(&json!({"confidence": 1.0, "threat_level": 2.5}));
        assert_eq!(data.confidence.as_deref(), Some("1"));
        assert_eq!(data.threat_level.as_deref(), Some("2.5"));
    }

    #[test]
    fn truthy_non_object_domain_info_is_present_but_blank() {
        let data = SafetyData::from_value(&json!({"domain_info": "n/a"}));
        assert_eq!(data.domain_info, Some(DomainInfo::default()));

        let data = SafetyData::from_value(&json!({"domain_info": null}));
        assert_eq!(data.domain_info, None);
    }

    #[test]
    fn mock_payload_is_fixed() {
        let SafetyCheckResult::Success { data } = SafetyCheckResult::mock() else {
            panic!("mock must be a success");
        };
        assert_eq!(data.is_safe, Some(true));
        assert_eq!(data.threat_level.as_deref(), Some("low"));
        assert_eq!(data.categories, Some(vec!["unknown".to_string()]));
        assert_eq!(
            data.reason.as_deref(),
            Some("API not configured - mock response")
        );
        assert_eq!(data.confidence, None);
        assert_eq!(data.domain_info, None);
    }

    #[test]
    fn status_hint_display() {
        assert_eq!(StatusHint::Code(503).to_string(), "503");
        assert_eq!(StatusHint::Unknown.to_string(), "Unknown");
    }
}
