//! Sequential string tokenization.
//!
//! [`Tokenizer`] is the primary, reentrant API: the scan cursor lives in the
//! caller's hands. [`strtok_legacy`] reproduces the classic implicit-state
//! convenience form on top of it, retaining a single process-wide cursor
//! between calls; it is NOT reentrant and NOT safe for concurrent use even
//! though a mutex serializes the cursor itself — interleaved callers will
//! corrupt each other's scans. Prefer [`Tokenizer`].
//!
//! In this safe model the buffer is tokenized in place: the first delimiter
//! byte after each token is overwritten with NUL and tokens come back as
//! `(start, len)` index pairs into the caller's buffer.

/// True if `b` is in the delimiter set. A NUL byte ends the set, so
/// NUL-terminated delimiter strings work unchanged.
fn is_delim(b: u8, delimiters: &[u8]) -> bool {
    delimiters
        .iter()
        .take_while(|&&d| d != 0)
        .any(|&d| d == b)
}

/// Scan for the next token from `offset`. Returns the token bounds and the
/// offset to resume from, or `None` when only delimiters (or nothing)
/// remain. Writes NUL over the terminating delimiter.
fn scan_token(s: &mut [u8], delimiters: &[u8], offset: usize) -> Option<(usize, usize, usize)> {
    let len = s.len();
    let mut pos = offset;

    while pos < len && s[pos] != 0 && is_delim(s[pos], delimiters) {
        pos += 1;
    }
    if pos >= len || s[pos] == 0 {
        return None;
    }

    let start = pos;
    while pos < len && s[pos] != 0 && !is_delim(s[pos], delimiters) {
        pos += 1;
    }
    let token_len = pos - start;

    if pos < len && s[pos] != 0 {
        s[pos] = 0;
        pos += 1;
    }
    Some((start, token_len, pos))
}

/// Explicit-cursor sequential tokenizer.
///
/// ```
/// use barestdio_core::string::Tokenizer;
///
/// let mut buf = *b"a,b;;c";
/// let mut tok = Tokenizer::new();
/// let mut tokens = Vec::new();
/// while let Some((start, len)) = tok.next_token(&mut buf, b",;") {
///     tokens.push((start, len));
/// }
/// assert_eq!(tokens, vec![(0, 1), (2, 1), (5, 1)]);
/// ```
#[derive(Debug, Default)]
pub struct Tokenizer {
    cursor: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer { cursor: 0 }
    }

    /// Restart scanning from the beginning of a (new) buffer.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Next token in `s`, or `None` when the buffer is exhausted. The same
    /// buffer must be passed on every call of one scan; the first delimiter
    /// after the token is overwritten with NUL.
    pub fn next_token(&mut self, s: &mut [u8], delimiters: &[u8]) -> Option<(usize, usize)> {
        let (start, len, next) = scan_token(s, delimiters, self.cursor)?;
        self.cursor = next;
        Some((start, len))
    }
}

#[cfg(feature = "std")]
mod legacy {
    use parking_lot::Mutex;

    /// Process-wide retained cursor for [`strtok_legacy`].
    static LAST: Mutex<usize> = Mutex::new(0);

    /// Legacy implicit-state tokenizer.
    ///
    /// `restart` plays the role of passing a fresh string to C `strtok`:
    /// `true` resets the process-wide cursor to the start of `s`, `false`
    /// continues the previous scan (the caller must pass the same buffer).
    ///
    /// NOT reentrant: the cursor is shared by the whole process and is only
    /// reset at call boundaries. Concurrent or interleaved scans must use
    /// [`super::Tokenizer`] instead.
    pub fn strtok_legacy(
        s: &mut [u8],
        delimiters: &[u8],
        restart: bool,
    ) -> Option<(usize, usize)> {
        let mut last = LAST.lock();
        if restart {
            *last = 0;
        }
        let (start, len, next) = super::scan_token(s, delimiters, *last)?;
        *last = next;
        Some((start, len))
    }
}

#[cfg(feature = "std")]
pub use legacy::strtok_legacy;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(buf: &mut [u8], delims: &[u8]) -> Vec<Vec<u8>> {
        let mut tok = Tokenizer::new();
        let mut out = Vec::new();
        while let Some((start, len)) = tok.next_token(buf, delims) {
            out.push(buf[start..start + len].to_vec());
        }
        out
    }

    #[test]
    fn splits_on_delimiters() {
        let mut buf = *b"one two  three";
        assert_eq!(
            collect(&mut buf, b" "),
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
    }

    #[test]
    fn leading_and_trailing_delimiters_skipped() {
        let mut buf = *b",,a,b,,";
        assert_eq!(collect(&mut buf, b","), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn delimiter_overwritten_with_nul() {
        let mut buf = *b"x:y";
        let mut tok = Tokenizer::new();
        assert_eq!(tok.next_token(&mut buf, b":"), Some((0, 1)));
        assert_eq!(buf[1], 0);
    }

    #[test]
    fn empty_and_all_delimiter_buffers() {
        let mut empty: [u8; 0] = [];
        assert_eq!(Tokenizer::new().next_token(&mut empty, b","), None);

        let mut only = *b";;;";
        assert_eq!(Tokenizer::new().next_token(&mut only, b";"), None);
    }

    #[test]
    fn nul_terminated_delimiter_set() {
        let mut buf = *b"a b";
        // bytes after the NUL are ignored
        assert_eq!(
            collect(&mut buf, b" \0x"),
            vec![b"a".to_vec(), b"b".to_vec()]
        );

        // 'x' sits past the NUL, so it is not a delimiter here
        let mut buf = *b"axb ayb";
        assert_eq!(
            collect(&mut buf, b" \0x"),
            vec![b"axb".to_vec(), b"ayb".to_vec()]
        );
    }

    #[test]
    fn multiple_delimiter_kinds() {
        let mut buf = *b"k=v;k2=v2";
        assert_eq!(
            collect(&mut buf, b"=;"),
            vec![
                b"k".to_vec(),
                b"v".to_vec(),
                b"k2".to_vec(),
                b"v2".to_vec()
            ]
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn legacy_wrapper_retains_cursor_between_calls() {
        let mut buf = *b"p/q/r";
        assert_eq!(strtok_legacy(&mut buf, b"/", true), Some((0, 1)));
        assert_eq!(strtok_legacy(&mut buf, b"/", false), Some((2, 1)));
        assert_eq!(strtok_legacy(&mut buf, b"/", false), Some((4, 1)));
        assert_eq!(strtok_legacy(&mut buf, b"/", false), None);
    }
}
