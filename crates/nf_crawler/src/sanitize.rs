//! Lossy UTF-8 repair.
//!
//! Every invalid byte becomes a single ASCII space; valid sequences are kept
//! as they are. Unrecoverable bytes are silently lost, which is accepted in
//! exchange for never failing on bad input.

use std::borrow::Cow;

/// Repair `input` into valid UTF-8. Borrows when nothing needs fixing.
pub fn clean_utf8(input: &[u8]) -> Cow<'_, str> {
    if let Ok(valid) = std::str::from_utf8(input) {
        return Cow::Borrowed(valid);
    }

    let mut out = String::with_capacity(input.len());
    for chunk in input.utf8_chunks() {
        out.push_str(chunk.valid());
        out.extend(std::iter::repeat(' ').take(chunk.invalid().len()));
    }
    Cow::Owned(out)
}

/// Number of characters in a content preview.
pub const PREVIEW_CHARS: usize = 100;

/// First `max` characters of `text`, for log lines.
pub fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
