//! Sliding-window text chunker.
//!
//! Splits document text into fixed-size character windows that overlap by
//! a configurable amount, so a sentence cut at one window edge still appears
//! whole in the neighbouring window.
//!
//! # Algorithm
//!
//! 1. Empty text yields no chunks.
//! 2. Take the window `[start, start + size)`, clamped to the text end.
//! 3. Stop once a window reaches the end of the text.
//! 4. Otherwise advance `start` to `end - overlap` and repeat.
//!
//! Sizes are counted in characters (Unicode scalar values), and every slice
//! lands on a UTF-8 boundary. The last chunk may be shorter than `size`.
//!
//! # Example
//!
//! ```rust
//! use janet_core::chunk::chunk_text;
//!
//! let chunks = chunk_text("abcdefghij", 4, 1);
//! assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
//! ```

/// Split `text` into windows of `size` characters overlapping by `overlap`.
///
/// Requires `size > overlap`; [`IndexConfig`](crate::IndexConfig) enforces
/// this for the index. Called directly with `overlap >= size`, the window
/// still advances by one character so the loop always terminates.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<&str> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    // Byte offset of every character boundary, including the end of text.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(char_len);
        chunks.push(&text[boundaries[start]..boundaries[end]]);
        if end == char_len {
            break;
        }
        start = end.saturating_sub(overlap).max(start + 1);
    }

    chunks
}
