//! Masking of secrets before they reach a log line.

use regex::Regex;
use std::sync::LazyLock;

static SECRET_FIELDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)"(password|senha|token|access_token|auth_token|api[_-]?key|secret|authorization)"\s*:\s*"[^"]*""#,
    )
    .ok()
});

static PHONE_NUMBERS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\+?\b\d{10,15}\b").ok());

/// Redact secret JSON fields and phone numbers from free text
pub fn redact_sensitive_data(input: &str) -> String {
    let mut result = input.to_string();

    if let Some(re) = SECRET_FIELDS.as_ref() {
        result = re.replace_all(&result, r#""$1": "[REDACTED]""#).into_owned();
    }
    if let Some(re) = PHONE_NUMBERS.as_ref() {
        result = re.replace_all(&result, "[PHONE]").into_owned();
    }

    result
}
