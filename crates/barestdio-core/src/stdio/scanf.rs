//! scanf parsing engine.
//!
//! Walks a template and an input buffer in lock-step: whitespace in the
//! template matches runs of whitespace in the input, literal bytes must
//! match exactly, and each `%` directive consumes a prefix of the remaining
//! input, storing the converted value through an explicit destination slot
//! (the safe stand-in for a C pointer argument).
//!
//! Parsing stops at the first mismatch, exhausted input, or invalid
//! conversion and returns the count of directives that successfully stored a
//! value up to that point. Partial work is never rolled back.
//!
//! Supported conversions: `d i u o x X c s n %`. An unrecognized conversion
//! halts the parse (the formatter drops them instead; the asymmetry is
//! deliberate). `%n` and a matched `%%` do not increment the returned count.

use crate::stdlib::conversion::{atoi, strtoll, strtoull};

// ---------------------------------------------------------------------------
// Destination slots
// ---------------------------------------------------------------------------

/// One destination slot backing a parse call.
///
/// The slot's variant is authoritative for the width actually written; the
/// directive's length qualifier declares the caller's intent and the stored
/// value is narrowed or widened to fit the slot. Integer stores wrap, never
/// error.
#[derive(Debug)]
pub enum ScanArg<'a> {
    /// `%c` destination: raw bytes, no terminator appended.
    Chars(&'a mut [u8]),
    /// `%s` destination. `None` is legal: matched bytes are consumed and the
    /// directive counts as stored, but nothing is written.
    Str(Option<&'a mut [u8]>),
    SChar(&'a mut i8),
    UChar(&'a mut u8),
    Short(&'a mut i16),
    UShort(&'a mut u16),
    Int(&'a mut i32),
    UInt(&'a mut u32),
    Long(&'a mut i64),
    ULong(&'a mut u64),
    Size(&'a mut usize),
}

impl ScanArg<'_> {
    /// Store a converted integer, narrowing to the slot's width. `raw`
    /// carries the two's-complement bit pattern for signed conversions.
    fn store_int(&mut self, raw: u64) -> bool {
        match self {
            ScanArg::SChar(d) => **d = raw as i8,
            ScanArg::UChar(d) => **d = raw as u8,
            ScanArg::Short(d) => **d = raw as i16,
            ScanArg::UShort(d) => **d = raw as u16,
            ScanArg::Int(d) => **d = raw as i32,
            ScanArg::UInt(d) => **d = raw as u32,
            ScanArg::Long(d) => **d = raw as i64,
            ScanArg::ULong(d) => **d = raw,
            ScanArg::Size(d) => **d = raw as usize,
            _ => return false,
        }
        true
    }
}

/// Length qualifier of a parser directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    None,
    Char,     // hh
    Short,    // h
    Long,     // l
    LongLong, // ll / L
    Size,     // z / Z
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

/// End of input is the slice end or an embedded NUL, whichever comes first.
fn at_end(buf: &[u8], pos: usize) -> bool {
    pos >= buf.len() || buf[pos] == 0
}

fn skip_whitespace(buf: &[u8], mut pos: usize) -> usize {
    while !at_end(buf, pos) && buf[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Skip to the next whitespace boundary (the `%*` token skip).
fn skip_token(buf: &[u8], mut pos: usize) -> usize {
    while !at_end(buf, pos) && !buf[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Reduce a converted value to the width the length qualifier declared,
/// sign-extending for signed conversions. The destination slot then narrows
/// again to its own width; when slot and qualifier agree (the contract) the
/// second narrowing is a no-op.
fn qualifier_narrow(raw: u64, qualifier: Qualifier, signed: bool) -> u64 {
    match qualifier {
        Qualifier::Char => {
            if signed {
                raw as i8 as i64 as u64
            } else {
                u64::from(raw as u8)
            }
        }
        Qualifier::Short => {
            if signed {
                raw as i16 as i64 as u64
            } else {
                u64::from(raw as u16)
            }
        }
        Qualifier::None => {
            if signed {
                raw as i32 as i64 as u64
            } else {
                u64::from(raw as u32)
            }
        }
        Qualifier::Long | Qualifier::LongLong | Qualifier::Size => raw,
    }
}

fn digit_valid_for_base(digit: u8, base: u32) -> bool {
    match base {
        16 => digit.is_ascii_hexdigit(),
        8 => digit.is_ascii_digit() && digit <= b'7',
        // base 0 auto-detects from the prefix; a leading decimal digit is
        // all that can be checked here.
        _ => digit.is_ascii_digit(),
    }
}

// ---------------------------------------------------------------------------
// Core interpreter
// ---------------------------------------------------------------------------

/// Parse `input` against `format`, storing converted values through `args`
/// in order. Returns the number of directives that successfully stored (or
/// matched) a value; `%n` and `%%` do not count.
pub fn vsscanf(input: &[u8], format: &[u8], args: &mut [ScanArg<'_>]) -> usize {
    let buf = input;
    let mut s = 0usize; // input cursor
    let mut f = 0usize; // format cursor
    let mut next_arg = 0usize;
    let mut stored = 0usize;

    while !at_end(format, f) && !at_end(buf, s) {
        // Whitespace in the format maps to a whitespace run in the input.
        if format[f].is_ascii_whitespace() {
            f = skip_whitespace(format, f);
            s = skip_whitespace(buf, s);
        }

        // Literal bytes must match exactly.
        if !at_end(format, f) && format[f] != b'%' {
            if at_end(buf, s) || format[f] != buf[s] {
                break;
            }
            f += 1;
            s += 1;
            continue;
        }

        if at_end(format, f) {
            break;
        }
        f += 1; // skip '%'

        // '*': the directive is matched but not stored. Both the template
        // token and the input token are skipped to the next whitespace
        // boundary.
        if !at_end(format, f) && format[f] == b'*' {
            f = skip_token(format, f);
            s = skip_token(buf, s);
            continue;
        }

        // ':': delimiter mode for the following string conversion, making
        // ':' and ';' the terminators instead of whitespace.
        let mut delimiter_mode = false;
        if !at_end(format, f) && format[f] == b':' {
            delimiter_mode = true;
            f += 1;
        }

        // Field width: maximum bytes the directive may consume. Applies to
        // the c and s conversions only.
        let mut width = None;
        if !at_end(format, f) && format[f].is_ascii_digit() {
            let (w, used) = atoi(&format[f..]);
            width = Some(w as usize);
            f += used;
        }

        // Length qualifier, with doubling: hh selects char width, ll (or a
        // bare L) long long, z/Z the size type.
        let mut qualifier = Qualifier::None;
        if !at_end(format, f) {
            qualifier = match format[f] {
                b'h' => Qualifier::Short,
                b'l' => Qualifier::Long,
                b'L' => Qualifier::LongLong,
                b'z' | b'Z' => Qualifier::Size,
                _ => Qualifier::None,
            };
            if qualifier != Qualifier::None {
                let first = format[f];
                f += 1;
                if !at_end(format, f) && format[f] == first {
                    if first == b'h' {
                        qualifier = Qualifier::Char;
                        f += 1;
                    } else if first == b'l' {
                        qualifier = Qualifier::LongLong;
                        f += 1;
                    }
                }
            }
        }

        if at_end(format, f) || at_end(buf, s) {
            break;
        }

        let mut base: u32 = 10;
        let mut sign = false;

        let conversion = format[f];
        f += 1;
        match conversion {
            b'c' => {
                let Some(ScanArg::Chars(dest)) = args.get_mut(next_arg) else {
                    return stored;
                };
                next_arg += 1;
                // Copies exactly width bytes (default 1), at least one, no
                // whitespace skip, no terminator.
                let mut remaining = width.unwrap_or(1).max(1);
                let mut out = 0usize;
                loop {
                    if out < dest.len() {
                        dest[out] = buf[s];
                        out += 1;
                    }
                    s += 1;
                    remaining -= 1;
                    if at_end(buf, s) || remaining == 0 {
                        break;
                    }
                }
                stored += 1;
                continue;
            }

            b's' => {
                let Some(ScanArg::Str(dest)) = args.get_mut(next_arg) else {
                    return stored;
                };
                next_arg += 1;
                let mut remaining = width.unwrap_or(usize::MAX);
                s = skip_whitespace(buf, s);
                let mut out = 0usize;
                while !at_end(buf, s) && remaining > 0 {
                    let b = buf[s];
                    if delimiter_mode {
                        if b == b':' || b == b';' {
                            break;
                        }
                    } else if b.is_ascii_whitespace() {
                        break;
                    }
                    if let Some(d) = dest.as_deref_mut()
                        && out < d.len()
                    {
                        d[out] = b;
                        out += 1;
                    }
                    s += 1;
                    remaining -= 1;
                }
                if let Some(d) = dest.as_deref_mut()
                    && out < d.len()
                {
                    d[out] = 0;
                }
                stored += 1;
                continue;
            }

            b'n' => {
                // Bytes consumed so far; consumes no input and does not
                // increment the success count.
                let Some(arg) = args.get_mut(next_arg) else {
                    return stored;
                };
                next_arg += 1;
                arg.store_int(s as u64);
                continue;
            }

            b'i' => {
                base = 0;
                sign = true;
            }
            b'd' => {
                sign = true;
            }
            b'u' => {}
            b'o' => {
                base = 8;
            }
            b'x' | b'X' => {
                base = 16;
            }

            b'%' => {
                // Literal percent match; does not increment the count.
                let matched = buf[s] == b'%';
                s += 1;
                if matched {
                    continue;
                }
                return stored;
            }

            // Unrecognized conversion halts the parse.
            _ => return stored,
        }

        // Numeric conversion. Skip leading whitespace, then validate the
        // first significant byte against the digit alphabet for the base
        // before consuming anything.
        s = skip_whitespace(buf, s);
        let mut probe = s;
        if sign && !at_end(buf, probe) && (buf[probe] == b'-' || buf[probe] == b'+') {
            probe += 1;
        }
        if at_end(buf, probe) || !digit_valid_for_base(buf[probe], base) {
            break;
        }

        let (raw, used) = if sign {
            let (v, used) = strtoll(&buf[s..], base);
            (v as u64, used)
        } else {
            strtoull(&buf[s..], base)
        };

        let Some(arg) = args.get_mut(next_arg) else {
            return stored;
        };
        next_arg += 1;
        if !arg.store_int(qualifier_narrow(raw, qualifier, sign)) {
            return stored;
        }

        s += used;
        stored += 1;
    }

    stored
}

/// Entry point mirroring `sscanf`: establishes the destination-slot list
/// and forwards to [`vsscanf`].
pub fn sscanf(input: &[u8], format: &[u8], args: &mut [ScanArg<'_>]) -> usize {
    vsscanf(input, format, args)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_and_string() {
        let mut n = 0i32;
        let mut buf = [0u8; 8];
        let count = vsscanf(
            b"42 foo",
            b"%d %s",
            &mut [ScanArg::Int(&mut n), ScanArg::Str(Some(&mut buf))],
        );
        assert_eq!(count, 2);
        assert_eq!(n, 42);
        assert_eq!(&buf[..4], b"foo\0");
    }

    #[test]
    fn invalid_digit_leaves_destination_untouched() {
        let mut n = 77i32;
        let count = vsscanf(b"abc", b"%d", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 0);
        assert_eq!(n, 77);
    }

    #[test]
    fn negative_and_plus_signs() {
        let mut a = 0i32;
        let mut b = 0i32;
        let count = vsscanf(
            b"-13 +9",
            b"%d %d",
            &mut [ScanArg::Int(&mut a), ScanArg::Int(&mut b)],
        );
        assert_eq!(count, 2);
        assert_eq!(a, -13);
        assert_eq!(b, 9);
    }

    #[test]
    fn unsigned_rejects_sign() {
        let mut u = 5u32;
        let count = vsscanf(b"-3", b"%u", &mut [ScanArg::UInt(&mut u)]);
        assert_eq!(count, 0);
        assert_eq!(u, 5);
    }

    #[test]
    fn octal_and_hex() {
        let mut o = 0u32;
        let mut x = 0u32;
        let count = vsscanf(
            b"17 ff",
            b"%o %x",
            &mut [ScanArg::UInt(&mut o), ScanArg::UInt(&mut x)],
        );
        assert_eq!(count, 2);
        assert_eq!(o, 0o17);
        assert_eq!(x, 0xff);
    }

    #[test]
    fn base_autodetect_with_i() {
        let mut a = 0i64;
        let mut b = 0i64;
        let mut c = 0i64;
        let count = vsscanf(
            b"0x10 010 10",
            b"%li %li %li",
            &mut [
                ScanArg::Long(&mut a),
                ScanArg::Long(&mut b),
                ScanArg::Long(&mut c),
            ],
        );
        assert_eq!(count, 3);
        assert_eq!(a, 16);
        assert_eq!(b, 8);
        assert_eq!(c, 10);
    }

    #[test]
    fn literal_mismatch_halts_with_partial_count() {
        let mut a = 0i32;
        let mut b = 0i32;
        let count = vsscanf(
            b"1,2",
            b"%d;%d",
            &mut [ScanArg::Int(&mut a), ScanArg::Int(&mut b)],
        );
        assert_eq!(count, 1);
        assert_eq!(a, 1);
        assert_eq!(b, 0);
    }

    #[test]
    fn whitespace_in_template_matches_runs() {
        let mut a = 0i32;
        let mut b = 0i32;
        let count = vsscanf(
            b"  7 \t\n  8",
            b" %d %d",
            &mut [ScanArg::Int(&mut a), ScanArg::Int(&mut b)],
        );
        assert_eq!(count, 2);
        assert_eq!(a, 7);
        assert_eq!(b, 8);
    }

    #[test]
    fn char_conversion_copies_exact_width() {
        let mut one = [0u8; 1];
        let count = vsscanf(b"xyz", b"%c", &mut [ScanArg::Chars(&mut one)]);
        assert_eq!(count, 1);
        assert_eq!(one[0], b'x');

        let mut three = [0u8; 3];
        let count = vsscanf(b"  a", b"%3c", &mut [ScanArg::Chars(&mut three)]);
        assert_eq!(count, 1);
        // no whitespace skip for %c
        assert_eq!(&three, b"  a");
    }

    #[test]
    fn string_width_limit() {
        let mut buf = [0u8; 8];
        let count = vsscanf(b"abcdefgh", b"%3s", &mut [ScanArg::Str(Some(&mut buf))]);
        assert_eq!(count, 1);
        assert_eq!(&buf[..4], b"abc\0");
    }

    #[test]
    fn null_string_destination_consumes_and_counts() {
        let mut n = 0i32;
        let count = vsscanf(
            b"skipme 42",
            b"%s %d",
            &mut [ScanArg::Str(None), ScanArg::Int(&mut n)],
        );
        assert_eq!(count, 2);
        assert_eq!(n, 42);
    }

    #[test]
    fn delimiter_mode_splits_on_colon_and_semicolon() {
        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        let count = vsscanf(
            b"1:2;3",
            b"%:s:%:s",
            &mut [ScanArg::Str(Some(&mut a)), ScanArg::Str(Some(&mut b))],
        );
        assert_eq!(count, 2);
        assert_eq!(&a[..2], b"1\0");
        assert_eq!(&b[..2], b"2\0");
    }

    #[test]
    fn suppressed_directive_skips_both_tokens() {
        let mut n = 0i32;
        let count = vsscanf(b"junk 5", b"%*s %d", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 1);
        assert_eq!(n, 5);
    }

    #[test]
    fn percent_n_reports_offset_without_counting() {
        let mut n = 0i32;
        let mut consumed = 0i32;
        let count = vsscanf(
            b"123 rest",
            b"%d%n",
            &mut [ScanArg::Int(&mut n), ScanArg::Int(&mut consumed)],
        );
        assert_eq!(count, 1);
        assert_eq!(n, 123);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn percent_percent_matches_without_counting() {
        let mut n = 0i32;
        let count = vsscanf(b"% 5", b"%% %d", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 1);
        assert_eq!(n, 5);
    }

    #[test]
    fn percent_percent_mismatch_returns_immediately() {
        let mut n = 0i32;
        let count = vsscanf(b"x 5", b"%% %d", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 0);
        assert_eq!(n, 0);
    }

    #[test]
    fn unknown_conversion_halts() {
        let mut n = 0i32;
        let count = vsscanf(b"5 6", b"%d %q", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 1);
        assert_eq!(n, 5);
    }

    #[test]
    fn qualifier_widths_narrow_through_slots() {
        let mut c = 0i8;
        let mut h = 0i16;
        let mut ll = 0i64;
        let mut z = 0usize;
        let count = vsscanf(
            b"-5 -300 -9999999999 77",
            b"%hhd %hd %lld %zu",
            &mut [
                ScanArg::SChar(&mut c),
                ScanArg::Short(&mut h),
                ScanArg::Long(&mut ll),
                ScanArg::Size(&mut z),
            ],
        );
        assert_eq!(count, 4);
        assert_eq!(c, -5);
        assert_eq!(h, -300);
        assert_eq!(ll, -9_999_999_999);
        assert_eq!(z, 77);
    }

    #[test]
    fn input_exhaustion_reports_prior_successes() {
        let mut a = 0i32;
        let mut b = 0i32;
        let count = vsscanf(
            b"42",
            b"%d %d",
            &mut [ScanArg::Int(&mut a), ScanArg::Int(&mut b)],
        );
        assert_eq!(count, 1);
        assert_eq!(a, 42);
    }

    #[test]
    fn overflow_wraps_modulo_2_64() {
        let mut v = 0u64;
        // 2^64 + 5
        let count = vsscanf(
            b"18446744073709551621",
            b"%lu",
            &mut [ScanArg::ULong(&mut v)],
        );
        assert_eq!(count, 1);
        assert_eq!(v, 5);
    }

    #[test]
    fn embedded_nul_terminates_input() {
        let mut n = 0i32;
        let count = vsscanf(b"12\0 34", b"%d %d", &mut [ScanArg::Int(&mut n)]);
        assert_eq!(count, 1);
        assert_eq!(n, 12);
    }
}
