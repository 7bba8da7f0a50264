//! String utilities for the domain layer.

/// Return the first `max_chars` characters of `s` (UTF-8 safe).
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// First `max_chars` characters followed by `...`.
///
/// The ellipsis is always appended, even when nothing was cut.
pub fn ellipsize(s: &str, max_chars: usize) -> String {
    format!("{}...", take_chars(s, max_chars))
}

/// Truncate to approximately `max_bytes` without splitting a character,
/// for log previews.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
