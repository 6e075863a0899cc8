use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max_width` terminal columns, without an ellipsis.
pub fn clip_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > max_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result
}

/// Shorten `text` to `max_width` columns, ending in "..." when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    const ELLIPSIS: &str = "...";
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }
    let mut result = clip_to_width(text, max_width - ELLIPSIS.len());
    result.push_str(ELLIPSIS);
    result
}

/// Lowercase ASCII slug: runs of anything but letters and digits become one '-'.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
