//! Character-based context windows over byte spans
//!
//! Keyword proximity is measured in characters, not bytes; CJK text makes
//! the two wildly different. Both the phone and date recognizers widen a
//! regex match's byte span through this one helper so they agree on what
//! "within N characters" means.

/// Widen the byte span `[start, end)` by `before`/`after` characters,
/// clamped to the text. `start` and `end` must lie on char boundaries.
pub(crate) fn char_window(
    text: &str,
    start: usize,
    end: usize,
    before: usize,
    after: usize,
) -> &str {
    let begin = if before == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(before - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let stop = text[end..]
        .char_indices()
        .nth(after)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[begin..stop]
}
