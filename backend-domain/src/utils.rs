// Small text helpers shared across layers

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Truncates to `max` characters, appending "..." when cut.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Korean mobile numbers are stored in E.164 form: 01012345678 -> +821012345678.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let normalized = if let Some(rest) = digits.strip_prefix("+82") {
        format!("+82{}", rest.trim_start_matches('0'))
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+82{rest}")
    } else {
        return None;
    };
    let national = &normalized[3..];
    if national.len() < 9 || national.len() > 10 || !national.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(normalized)
}
