use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Clip `text` to `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Replace every character with `*` so tokens never appear on screen.
pub fn mask(text: &str) -> String {
    "*".repeat(text.chars().count())
}

/// Shortest decimal form of the amount as sent by the API, e.g. `5`, `2.5`, `12.346`.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}
