// SPDX-License-Identifier: Apache-2.0

//! Masks access tokens and other secrets before anything is displayed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Replacement text for masked content.
pub const REDACTED: &str = "[REDACTED]";

static ACCESS_TOKEN_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([?&]access_token=)[^&\s]+").expect("access token pattern is valid")
});

const SENSITIVE_KEYWORDS: &[&str] = &[
    "token",
    "authorization",
    "secret",
    "password",
    "api_key",
    "apikey",
];

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|word| lower.contains(word))
}

/// Masks `access_token=` query parameters and every literal occurrence of `secret`.
///
/// An empty `secret` only applies the query-parameter rule.
#[must_use]
pub fn redact_str(value: &str, secret: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let masked = ACCESS_TOKEN_QUERY.replace_all(value, format!("${{1}}{REDACTED}"));
    if secret.is_empty() {
        return masked.into_owned();
    }
    masked.replace(secret, REDACTED)
}

/// Returns a copy of `value` with sensitive keys and secrets masked.
///
/// Object values under keys that mention a credential are replaced wholesale;
/// strings anywhere else go through [`redact_str`].
#[must_use]
pub fn redact_value(value: &Value, secret: &str) -> Value {
    match value {
        Value::Object(map) => {
            let clean: Map<String, Value> = map
                .iter()
                .map(|(key, nested)| {
                    let masked = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_value(nested, secret)
                    };
                    (key.clone(), masked)
                })
                .collect();
            Value::Object(clean)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|nested| redact_value(nested, secret))
                .collect(),
        ),
        Value::String(text) => Value::String(redact_str(text, secret)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_query_parameter() {
        let out = redact_str(
            "GET https://api.rollbar.com/api/1/items?access_token=abc123&page=1",
            "",
        );
        assert_eq!(
            out,
            "GET https://api.rollbar.com/api/1/items?access_token=[REDACTED]&page=1"
        );
    }

    #[test]
    fn test_redact_literal_secret() {
        let out = redact_str("token tok_live_42 rejected", "tok_live_42");
        assert_eq!(out, "token [REDACTED] rejected");
        assert!(!out.contains("tok_live_42"));
    }

    #[test]
    fn test_redact_empty_input() {
        assert_eq!(redact_str("", "secret"), "");
    }

    #[test]
    fn test_redact_str_is_idempotent() {
        let secret = "s3cr3t-value";
        let once = redact_str("x?access_token=s3cr3t-value and s3cr3t-value", secret);
        assert_eq!(redact_str(&once, secret), once);
    }

    #[test]
    fn test_redact_sensitive_keys() {
        let value = json!({
            "Authorization": "Bearer xyz",
            "api_key": 12,
            "nested": {"refresh_token": ["a", "b"], "name": "ok"},
            "count": 3,
            "flag": true
        });
        let out = redact_value(&value, "");

        assert_eq!(out["Authorization"], json!(REDACTED));
        assert_eq!(out["api_key"], json!(REDACTED));
        assert_eq!(out["nested"]["refresh_token"], json!(REDACTED));
        assert_eq!(out["nested"]["name"], json!("ok"));
        assert_eq!(out["count"], json!(3));
        assert_eq!(out["flag"], json!(true));
    }

    #[test]
    fn test_redact_value_recurses_into_arrays() {
        let value = json!({"issues": [{"title": "leaked abc-123"}, null]});
        let out = redact_value(&value, "abc-123");

        assert_eq!(out["issues"][0]["title"], json!("leaked [REDACTED]"));
        assert_eq!(out["issues"][1], Value::Null);
    }

    #[test]
    fn test_redact_value_is_idempotent() {
        let value = json!({"message": "call?access_token=zzz failed with zzz", "password": "p"});
        let once = redact_value(&value, "zzz");
        assert_eq!(redact_value(&once, "zzz"), once);
        assert!(!once.to_string().contains("zzz"));
    }
}
