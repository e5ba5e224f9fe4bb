use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render a gateway value as display text.
///
/// Multi-valued fields arrive as JSON arrays (one element per stored value)
/// and are joined with `", "`. `null` renders as an empty string.
///
/// # Examples
/// ```
/// use dwc_core::utils::text::display_value;
/// use serde_json::json;
/// assert_eq!(display_value(&json!("Ogooué-Ivindo")), "Ogooué-Ivindo");
/// assert_eq!(display_value(&json!(["a", "b"])), "a, b");
/// assert_eq!(display_value(&json!(12.5)), "12.5");
/// ```
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Format ISO datetime string to simple date format
///
/// # Examples
/// ```
/// use dwc_core::utils::text::format_datetime;
/// let datetime = "2023-12-25T10:30:00.000Z";
/// assert_eq!(format_datetime(datetime), "2023-12-25");
/// ```
pub fn format_datetime(datetime: &str) -> String {
    match datetime.split('T').next() {
        Some(date_part) => date_part.to_string(),
        None => datetime.to_string(),
    }
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let ellipsis_width = ELLIPSIS.width();

    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Right-pad `text` with spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}
