//! The one-byte delimiter model for an active string literal.

use bitflags::bitflags;

bitflags! {
    /// Flags describing an open (or about-to-open) string delimiter. Exactly
    /// one of `SINGLE`, `DOUBLE`, `BACKTICK` is set once a delimiter is
    /// initialized; the rest combine freely.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Delimiter: u8 {
        const SINGLE   = 0b0000_0001;
        const DOUBLE   = 0b0000_0010;
        const BACKTICK = 0b0000_0100;
        const RAW      = 0b0000_1000;
        const FORMAT   = 0b0001_0000;
        const TRIPLE   = 0b0010_0000;
        const BYTES    = 0b0100_0000;
    }
}

const _: () = assert!(std::mem::size_of::<Delimiter>() == 1);

impl Delimiter {
    /// Build a delimiter from a prefix character set and a quote character.
    /// `prefix` is the lowercased, deduplicated set of prefix letters seen
    /// before the quote (`f`/`r`/`b`/`u`); `triple` says whether the quote
    /// was tripled. Panics in debug builds if more than one quote kind is
    /// requested — an internal-contract violation the scanner's own callers
    /// never trigger from well-formed lookahead.
    #[must_use]
    pub fn new(quote: u8, prefix_has_raw: bool, prefix_has_format: bool, prefix_has_bytes: bool, triple: bool) -> Self {
        let mut flags = match quote {
            b'\'' => Delimiter::SINGLE,
            b'"' => Delimiter::DOUBLE,
            b'`' => Delimiter::BACKTICK,
            other => panic!("Delimiter::new called with non-quote byte {other:#x}"),
        };
        if prefix_has_raw {
            flags |= Delimiter::RAW;
        }
        if prefix_has_format {
            flags |= Delimiter::FORMAT;
        }
        if prefix_has_bytes {
            flags |= Delimiter::BYTES;
        }
        if triple {
            flags |= Delimiter::TRIPLE;
        }
        debug_assert_eq!(
            (flags & (Delimiter::SINGLE | Delimiter::DOUBLE | Delimiter::BACKTICK)).bits().count_ones(),
            1,
            "exactly one quote flag must be set"
        );
        flags
    }

    /// The byte that terminates this delimiter.
    #[must_use]
    pub fn quote_byte(self) -> u8 {
        if self.contains(Delimiter::SINGLE) {
            b'\''
        } else if self.contains(Delimiter::DOUBLE) {
            b'"'
        } else {
            b'`'
        }
    }

    #[must_use]
    #[inline]
    pub fn is_raw(self) -> bool {
        self.contains(Delimiter::RAW)
    }

    #[must_use]
    #[inline]
    pub fn is_format(self) -> bool {
        self.contains(Delimiter::FORMAT)
    }

    #[must_use]
    #[inline]
    pub fn is_triple(self) -> bool {
        self.contains(Delimiter::TRIPLE)
    }

    #[must_use]
    #[inline]
    pub fn is_bytes(self) -> bool {
        self.contains(Delimiter::BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_one_byte() {
        assert_eq!(std::mem::size_of::<Delimiter>(), 1);
    }

    #[test]
    fn plain_single_quote() {
        let d = Delimiter::new(b'\'', false, false, false, false);
        assert_eq!(d.quote_byte(), b'\'');
        assert!(!d.is_raw());
        assert!(!d.is_format());
        assert!(!d.is_triple());
    }

    #[test]
    fn raw_format_triple_double() {
        let d = Delimiter::new(b'"', true, true, false, true);
        assert_eq!(d.quote_byte(), b'"');
        assert!(d.is_raw());
        assert!(d.is_format());
        assert!(d.is_triple());
        assert!(!d.is_bytes());
    }
}
