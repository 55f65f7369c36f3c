//! Text helpers for diagnostics.

use std::borrow::Cow;

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}

/// Single-line excerpt for logs: newlines folded to spaces, cut at
/// `max_bytes` with a trailing `...` when shortened.
pub fn preview(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let cut = truncate_str(s, max_bytes);
    let shortened = cut.len() < s.len();
    if !shortened && !cut.contains('\n') {
        return Cow::Borrowed(cut);
    }
    let mut out = cut.replace(['\r', '\n'], " ");
    if shortened {
        out.push_str("...");
    }
    Cow::Owned(out)
}
