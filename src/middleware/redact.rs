//! Redaction of sensitive values before they reach a log line

use serde_json::Value;

pub const REDACTED: &str = "***";

/// Keys whose string values are redacted wherever they appear in a payload
pub const SENSITIVE_KEYS: &[&str] = &["indicator_value", "url", "email", "ip", "ipAddress"];

const VISIBLE_PREFIX: usize = 4;
const MIN_PARTIAL_LEN: usize = 9;

/// `""` stays empty, up to 8 chars are fully masked, longer values keep a
/// 4-char prefix. Counts chars, not bytes.
pub fn redact(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.chars().count() < MIN_PARTIAL_LEN {
        return REDACTED.to_string();
    }

    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    format!("{}{}", prefix, REDACTED)
}

pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.contains(&key)
}

/// Redact sensitive string fields in place, through nested objects and arrays
pub fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                match field {
                    Value::String(s) if is_sensitive_key(key) => *s = redact(s),
                    Value::Array(items) if is_sensitive_key(key) => {
                        for item in items.iter_mut() {
                            if let Value::String(s) = item {
                                *s = redact(s);
                            } else {
                                redact_json(item);
                            }
                        }
                    }
                    other => redact_json(other),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_thresholds() {
        assert_eq!(redact(""), "");
        assert_eq!(redact("abc"), "***");
        assert_eq!(redact("12345678"), "***");
        assert_eq!(redact("123456789"), "1234***");
        assert_eq!(redact("1234567890"), "1234***");
    }

    #[test]
    fn test_redact_counts_chars() {
        assert_eq!(redact("ééééééééé"), "éééé***");
    }

    #[test]
    fn test_redact_json_recurses() {
        let mut payload = json!({
            "indicator_type": "ip",
            "indicator_value": "203.0.113.200",
            "providers": ["abuseipdb"],
            "nested": {"email": "someone@example.com", "count": 3},
            "items": [{"url": "https://example.com/login"}, {"ip": "10.0.0.1"}],
            "ipAddress": ["192.168.100.100", "short"]
        });

        redact_json(&mut payload);

        assert_eq!(payload["indicator_type"], "ip");
        assert_eq!(payload["indicator_value"], "203.***");
        assert_eq!(payload["providers"][0], "abuseipdb");
        assert_eq!(payload["nested"]["email"], "some***");
        assert_eq!(payload["nested"]["count"], 3);
        assert_eq!(payload["items"][0]["url"], "http***");
        assert_eq!(payload["items"][1]["ip"], "***");
        assert_eq!(payload["ipAddress"], json!(["192.***", "***"]));
    }
}
