//! UTF-8 aware helpers for reading the source by byte offset.
//!
//! None of them panic on an offset inside a character; they return nothing instead.

/// The character starting at `offset`, if any.
pub(crate) fn char_at(input: &str, offset: usize) -> Option<char> {
    input.get(offset..).and_then(|rest| rest.chars().next())
}

/// The character ending right before `offset`, if any.
pub(crate) fn char_before(input: &str, offset: usize) -> Option<char> {
    input.get(..offset).and_then(|head| head.chars().next_back())
}

/// Slice `input` without panicking; an invalid range yields `""`.
pub(crate) fn slice(input: &str, start: usize, end: usize) -> &str {
    input.get(start..end).unwrap_or_default()
}
