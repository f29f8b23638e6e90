/// Returns the longest prefix of `text` holding at most `max_chars` characters.
///
/// Slices on a character boundary, so multi-byte text is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
