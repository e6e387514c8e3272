//! Short labels for records and nodes that carry no stored title.

/// Default maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 30;

const TITLE_DELIMITER: &str = " — ";

/// Derive a title from free text using the default length limit.
pub fn auto_title(text: &str) -> String {
    auto_title_with(text, TITLE_MAX_CHARS)
}

/// Derive a title from free text.
///
/// If the text contains `" — "` and the part before it is non-empty and at
/// most `max_chars` long, that prefix is the title. Otherwise the text is cut
/// to `max_chars` characters.
pub fn auto_title_with(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    if let Some(byte_idx) = text.find(TITLE_DELIMITER) {
        let prefix = &text[..byte_idx];
        let len = prefix.chars().count();
        if len > 0 && len <= max_chars {
            return prefix.to_string();
        }
    }

    text.chars().take(max_chars).collect()
}
