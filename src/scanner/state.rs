//! Scanner state: indent stack, delimiter stack, and the flags derived from
//! them, plus the compact serialization format of §6.

use crate::config::ScannerConfig;
use crate::delimiter::Delimiter;
use crate::error::LexError;
use smallvec::SmallVec;

/// Persistent scanner state, carried across invocations and checkpointed by
/// the host parser per §5/§6.
#[derive(Clone, Debug)]
pub struct ScannerState {
    /// Column widths, bottom element always `0`, monotone non-decreasing.
    indent_stack: SmallVec<[u8; 16]>,
    /// Active string delimiters, outermost first.
    delimiter_stack: SmallVec<[Delimiter; 4]>,
    /// True iff the top of `delimiter_stack` has the format flag set.
    inside_interpolated: bool,
    /// Whether an end-of-line has already been seen during the current
    /// dispatcher invocation sequence; tracked here because it spans the
    /// "skip horizontal whitespace, maybe see a comment, then decide"
    /// sub-steps of §4.1.
    seen_eol: bool,
    /// Indentation of the first comment seen at the current block level,
    /// used by the dedent rule (§4.1 rule 2). `None` once consumed.
    first_comment_indent: Option<u32>,
}

impl ScannerState {
    #[must_use]
    pub fn new() -> Self {
        let mut indent_stack = SmallVec::new();
        indent_stack.push(0);
        Self {
            indent_stack,
            delimiter_stack: SmallVec::new(),
            inside_interpolated: false,
            seen_eol: false,
            first_comment_indent: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn current_indent(&self) -> u32 {
        *self.indent_stack.last().expect("indent stack is never empty") as u32
    }

    /// Push a new, strictly greater indentation level.
    #[inline]
    pub fn push_indent(&mut self, column: u32, config: &ScannerConfig) {
        debug_assert!(column > self.current_indent());
        if self.indent_stack.len() < config.max_indent_depth {
            self.indent_stack.push(column.min(u8::MAX as u32) as u8);
        } else {
            log::debug!(
                "indent stack at configured max depth {}, further INDENT suppressed",
                config.max_indent_depth
            );
        }
    }

    /// Pop one indentation level. No-ops (returns `None`) if only the `0`
    /// bottom remains.
    #[inline]
    pub fn pop_indent(&mut self) -> Option<u32> {
        if self.indent_stack.len() <= 1 {
            return None;
        }
        self.indent_stack.pop().map(u32::from)
    }

    #[inline]
    #[must_use]
    pub fn indent_depth(&self) -> usize {
        self.indent_stack.len()
    }

    #[inline]
    #[must_use]
    pub fn inside_interpolated(&self) -> bool {
        self.inside_interpolated
    }

    #[inline]
    #[must_use]
    pub fn delimiter_depth(&self) -> usize {
        self.delimiter_stack.len()
    }

    #[inline]
    #[must_use]
    pub fn top_delimiter(&self) -> Option<Delimiter> {
        self.delimiter_stack.last().copied()
    }

    /// Push a newly opened string delimiter.
    #[inline]
    pub fn push_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter_stack.push(delimiter);
        self.inside_interpolated = delimiter.is_format();
    }

    /// Pop the delimiter closed by a `STRING_END`, refreshing
    /// `inside_interpolated` from the new top per §3's invariant.
    #[inline]
    pub fn pop_delimiter(&mut self) -> Option<Delimiter> {
        let popped = self.delimiter_stack.pop();
        self.inside_interpolated = self
            .delimiter_stack
            .last()
            .is_some_and(|d| d.is_format());
        popped
    }

    #[inline]
    #[must_use]
    pub fn seen_eol(&self) -> bool {
        self.seen_eol
    }

    #[inline]
    pub fn set_seen_eol(&mut self, seen: bool) {
        self.seen_eol = seen;
    }

    #[inline]
    #[must_use]
    pub fn first_comment_indent(&self) -> Option<u32> {
        self.first_comment_indent
    }

    #[inline]
    pub fn set_first_comment_indent(&mut self, indent: Option<u32>) {
        self.first_comment_indent = indent;
    }

    /// Serialize per §6: `[inside_interpolated][delimiter_count][delimiters...][indents...]`.
    /// `delimiter_count` saturates to 255; indent entries beyond `max_len`
    /// are silently truncated (both documented as acceptable lossy
    /// behavior in §7, logged once here).
    #[must_use]
    pub fn serialize(&self, max_len: usize) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 + self.delimiter_stack.len() + self.indent_stack.len());
        buf.push(u8::from(self.inside_interpolated));

        let delimiter_count = self.delimiter_stack.len().min(255);
        if self.delimiter_stack.len() > 255 {
            log::debug!(
                "delimiter stack depth {} saturates serialized count to 255",
                self.delimiter_stack.len()
            );
        }
        buf.push(delimiter_count as u8);
        buf.extend(self.delimiter_stack.iter().take(delimiter_count).map(|d| d.bits()));

        // Skip the implicit `0` bottom per §6.
        for &level in self.indent_stack.iter().skip(1) {
            if buf.len() >= max_len {
                log::debug!("indent stack truncated at buffer capacity {max_len}");
                break;
            }
            buf.push(level);
        }

        buf
    }

    /// Deserialize a buffer produced by [`ScannerState::serialize`].
    pub fn deserialize(buf: &[u8]) -> Result<Self, LexError> {
        let inside_interpolated = buf.first().copied().unwrap_or(0) != 0;
        let delimiter_count = buf.get(1).copied().unwrap_or(0) as usize;

        let delimiters_end = 2 + delimiter_count;
        if buf.len() < delimiters_end {
            return Err(LexError::TruncatedState {
                declared: delimiter_count,
                available: buf.len().saturating_sub(2),
            });
        }

        let delimiter_stack: SmallVec<[Delimiter; 4]> = buf[2..delimiters_end]
            .iter()
            .map(|&bits| Delimiter::from_bits_truncate(bits))
            .collect();

        let mut indent_stack: SmallVec<[u8; 16]> = SmallVec::new();
        indent_stack.push(0);
        indent_stack.extend(buf[delimiters_end..].iter().copied());

        Ok(Self {
            indent_stack,
            delimiter_stack,
            inside_interpolated,
            seen_eol: false,
            first_comment_indent: None,
        })
    }
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_zero_indent() {
        let state = ScannerState::new();
        assert_eq!(state.current_indent(), 0);
        assert_eq!(state.indent_depth(), 1);
    }

    #[test]
    fn push_pop_indent_round_trips() {
        let mut state = ScannerState::new();
        let config = ScannerConfig::default();
        state.push_indent(4, &config);
        state.push_indent(8, &config);
        assert_eq!(state.current_indent(), 8);
        assert_eq!(state.pop_indent(), Some(8));
        assert_eq!(state.current_indent(), 4);
        assert_eq!(state.pop_indent(), Some(4));
        assert_eq!(state.current_indent(), 0);
        assert_eq!(state.pop_indent(), None, "bottom 0 is never popped");
    }

    #[test]
    fn delimiter_push_pop_updates_inside_interpolated() {
        let mut state = ScannerState::new();
        let plain = Delimiter::new(b'\'', false, false, false, false);
        let fstring = Delimiter::new(b'"', false, true, false, false);

        state.push_delimiter(plain);
        assert!(!state.inside_interpolated());

        state.push_delimiter(fstring);
        assert!(state.inside_interpolated());

        state.pop_delimiter();
        assert!(!state.inside_interpolated(), "popping back to the plain string clears the flag");
    }

    #[test]
    fn serialize_round_trips() {
        let mut state = ScannerState::new();
        let config = ScannerConfig::default();
        state.push_indent(4, &config);
        state.push_indent(8, &config);
        state.push_delimiter(Delimiter::new(b'"', false, true, false, false));

        let bytes = state.serialize(256);
        let restored = ScannerState::deserialize(&bytes).unwrap();

        assert_eq!(restored.current_indent(), state.current_indent());
        assert_eq!(restored.indent_depth(), state.indent_depth());
        assert_eq!(restored.delimiter_depth(), state.delimiter_depth());
        assert_eq!(restored.inside_interpolated(), state.inside_interpolated());
        assert_eq!(restored.top_delimiter(), state.top_delimiter());
    }

    #[test]
    fn deserialize_rejects_truncated_buffer() {
        let buf = [0u8, 5u8]; // claims 5 delimiters, provides none
        let err = ScannerState::deserialize(&buf).unwrap_err();
        assert_eq!(
            err,
            LexError::TruncatedState {
                declared: 5,
                available: 0
            }
        );
    }
}
