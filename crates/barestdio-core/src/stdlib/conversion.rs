//! Numeric string conversions (strtoull family, strtod, atoi).
//!
//! These are the primitives behind the scanf parser's numeric directives,
//! usable on their own. C-style end pointers become consumed-byte counts:
//! every function returns `(value, consumed)` where `consumed` is the offset
//! the end pointer would have been set to.
//!
//! Accumulation wraps silently modulo 2^64 on overflow; callers wanting
//! range checking must bound their inputs. This is the documented contract,
//! not an oversight.

/// Resolve the effective base and the prefix bytes to skip.
///
/// Base 0 auto-detects: `0x` followed by a hex digit means 16, a leading `0`
/// means 8 (the zero itself is consumed as prefix), anything else means 10.
/// Base 16 skips an optional `0x`/`0X` prefix without looking at what
/// follows, so `"0xzz"` consumes two bytes and converts to 0.
fn parse_base_prefix(s: &[u8], base: u32) -> (u32, usize) {
    if base == 0 {
        if s.first() == Some(&b'0') {
            if s.get(1).is_some_and(|b| b.to_ascii_lowercase() == b'x')
                && s.get(2).is_some_and(u8::is_ascii_hexdigit)
            {
                (16, 2)
            } else {
                (8, 1)
            }
        } else {
            (10, 0)
        }
    } else if base == 16
        && s.first() == Some(&b'0')
        && s.get(1).is_some_and(|b| b.to_ascii_lowercase() == b'x')
    {
        (16, 2)
    } else {
        (base, 0)
    }
}

/// Convert a digit run to an unsigned 64-bit value in `base` (0 = auto).
///
/// Stops at the first byte that is not a valid digit for the effective
/// base. Returns the accumulated value and the bytes consumed, prefix
/// included — with no digits at all, `consumed` still covers any prefix
/// that was skipped.
pub fn strtoull(s: &[u8], base: u32) -> (u64, usize) {
    let (base, mut pos) = parse_base_prefix(s, base);
    let mut acc: u64 = 0;

    while pos < s.len() {
        let c = s[pos];
        let val = match c {
            b'0'..=b'9' => u32::from(c - b'0'),
            b'a'..=b'f' => u32::from(c - b'a' + 10),
            b'A'..=b'F' => u32::from(c - b'A' + 10),
            _ => break,
        };
        if val >= base {
            break;
        }
        acc = acc.wrapping_mul(u64::from(base)).wrapping_add(u64::from(val));
        pos += 1;
    }
    (acc, pos)
}

/// Signed wrapper over [`strtoull`]: one optional leading `+`/`-`, wrapping
/// negation on `-`.
pub fn strtoll(s: &[u8], base: u32) -> (i64, usize) {
    match s.first() {
        Some(b'+') => {
            let (v, used) = strtoull(&s[1..], base);
            (v as i64, used + 1)
        }
        Some(b'-') => {
            let (v, used) = strtoull(&s[1..], base);
            ((v as i64).wrapping_neg(), used + 1)
        }
        _ => {
            let (v, used) = strtoull(s, base);
            (v as i64, used)
        }
    }
}

/// Long-width form. This engine targets LP64, so long and long long share
/// the 64-bit conversion.
pub fn strtoul(s: &[u8], base: u32) -> (u64, usize) {
    strtoull(s, base)
}

/// Long-width signed form, see [`strtoul`].
pub fn strtol(s: &[u8], base: u32) -> (i64, usize) {
    strtoll(s, base)
}

/// Bare digit-run accumulator: no sign, no whitespace skip, wraps on
/// overflow. Reports how far it advanced so template scanners can walk a
/// cursor through embedded decimal literals.
pub fn atoi(s: &[u8]) -> (i32, usize) {
    let mut value = 0i32;
    let mut pos = 0;
    while pos < s.len() && s[pos].is_ascii_digit() {
        value = value
            .wrapping_mul(10)
            .wrapping_add(i32::from(s[pos] - b'0'));
        pos += 1;
    }
    (value, pos)
}

/// Convert a decimal floating-point literal to an f64.
///
/// Grammar: whitespace, optional sign, integer digits, optional `.` and
/// fraction digits, optional `e`/`E` with signed exponent digits. The
/// mantissa accumulates in a double and is rescaled by repeated squaring of
/// powers of ten, so results are close but not digit-exact — adequate for
/// diagnostic formatting, not for numerically sensitive consumers.
///
/// No digits at all yields `(0.0, 0)`. A decimal exponent outside the f64
/// exponent range yields `(inf, 0)`; in both cases the consumed count stays
/// zero, mirroring the C contract of leaving the end pointer untouched.
pub fn strtod(s: &[u8]) -> (f64, usize) {
    let len = s.len();
    let mut pos = 0;

    while pos < len && s[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let mut negative = false;
    if pos < len && (s[pos] == b'-' || s[pos] == b'+') {
        negative = s[pos] == b'-';
        pos += 1;
    }

    let mut number = 0.0f64;
    let mut exponent = 0i32;
    let mut num_digits = 0usize;

    while pos < len && s[pos].is_ascii_digit() {
        number = number * 10.0 + f64::from(s[pos] - b'0');
        pos += 1;
        num_digits += 1;
    }

    if pos < len && s[pos] == b'.' {
        pos += 1;
        let mut decimals = 0i32;
        while pos < len && s[pos].is_ascii_digit() {
            number = number * 10.0 + f64::from(s[pos] - b'0');
            pos += 1;
            num_digits += 1;
            decimals += 1;
        }
        exponent -= decimals;
    }

    if num_digits == 0 {
        return (0.0, 0);
    }

    if negative {
        number = -number;
    }

    if pos < len && (s[pos] == b'e' || s[pos] == b'E') {
        pos += 1;
        let mut exp_negative = false;
        if pos < len && (s[pos] == b'-' || s[pos] == b'+') {
            exp_negative = s[pos] == b'-';
            pos += 1;
        }
        let mut n = 0i32;
        while pos < len && s[pos].is_ascii_digit() {
            n = n.wrapping_mul(10).wrapping_add(i32::from(s[pos] - b'0'));
            pos += 1;
        }
        if exp_negative {
            exponent -= n;
        } else {
            exponent += n;
        }
    }

    if exponent < f64::MIN_EXP || exponent > f64::MAX_EXP {
        return (f64::INFINITY, 0);
    }

    // Rescale by repeated squaring of powers of ten.
    let mut p10 = 10.0f64;
    let mut n = exponent.unsigned_abs();
    while n > 0 {
        if n & 1 == 1 {
            if exponent < 0 {
                number /= p10;
            } else {
                number *= p10;
            }
        }
        n >>= 1;
        p10 *= p10;
    }

    (number, pos)
}

/// Single-precision narrowing wrapper over [`strtod`].
pub fn strtof(s: &[u8]) -> (f32, usize) {
    let (v, used) = strtod(s);
    (v as f32, used)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strtoull_plain_bases() {
        assert_eq!(strtoull(b"123456", 10), (123456, 6));
        assert_eq!(strtoull(b"ff", 16), (255, 2));
        assert_eq!(strtoull(b"FF", 16), (255, 2));
        assert_eq!(strtoull(b"17", 8), (0o17, 2));
    }

    #[test]
    fn strtoull_stops_at_invalid_digit() {
        assert_eq!(strtoull(b"12x", 10), (12, 2));
        assert_eq!(strtoull(b"19", 8), (1, 1));
        assert_eq!(strtoull(b"", 10), (0, 0));
    }

    #[test]
    fn base_autodetect() {
        assert_eq!(strtoull(b"0x10", 0), (16, 4));
        assert_eq!(strtoull(b"010", 0), (8, 3));
        assert_eq!(strtoull(b"10", 0), (10, 2));
        assert_eq!(strtoull(b"0", 0), (0, 1));
    }

    #[test]
    fn hex_prefix_quirks() {
        // base 16 skips "0x" without checking what follows
        assert_eq!(strtoull(b"0xzz", 16), (0, 2));
        // base 0 only commits to hex when a hex digit follows the prefix
        assert_eq!(strtoull(b"0xz", 0), (0, 1));
        assert_eq!(strtoull(b"0x1", 0), (1, 3));
    }

    #[test]
    fn strtoull_wraps_on_overflow() {
        // 2^64 + 5
        assert_eq!(strtoull(b"18446744073709551621", 10).0, 5);
        assert_eq!(strtoull(b"18446744073709551615", 10).0, u64::MAX);
    }

    #[test]
    fn strtoll_signs() {
        assert_eq!(strtoll(b"42", 10), (42, 2));
        assert_eq!(strtoll(b"-42", 10), (-42, 3));
        assert_eq!(strtoll(b"+42", 10), (42, 3));
        assert_eq!(strtoll(b"-0x10", 0), (-16, 5));
    }

    #[test]
    fn strtoll_sign_alone_still_consumes_it() {
        // endp lands past the sign even with no digits behind it
        assert_eq!(strtoll(b"-x", 10), (0, 1));
    }

    #[test]
    fn atoi_digit_run() {
        assert_eq!(atoi(b"123abc"), (123, 3));
        assert_eq!(atoi(b"abc"), (0, 0));
        assert_eq!(atoi(b"007"), (7, 3));
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn strtod_basic_forms() {
        let (v, used) = strtod(b"3.14");
        assert!(close(v, 3.14));
        assert_eq!(used, 4);

        let (v, used) = strtod(b"-2.5e3");
        assert!(close(v, -2500.0));
        assert_eq!(used, 6);

        let (v, used) = strtod(b"1e-2");
        assert!(close(v, 0.01));
        assert_eq!(used, 4);

        let (v, used) = strtod(b"  42xyz");
        assert!(close(v, 42.0));
        assert_eq!(used, 4);
    }

    #[test]
    fn strtod_fraction_only() {
        let (v, used) = strtod(b".5");
        assert!(close(v, 0.5));
        assert_eq!(used, 2);
    }

    #[test]
    fn strtod_no_digits_does_not_advance() {
        assert_eq!(strtod(b"abc"), (0.0, 0));
        assert_eq!(strtod(b"   "), (0.0, 0));
        assert_eq!(strtod(b""), (0.0, 0));
    }

    #[test]
    fn strtod_exponent_out_of_range_is_infinite() {
        let (v, used) = strtod(b"1e9999");
        assert!(v.is_infinite());
        assert_eq!(used, 0);
    }

    #[test]
    fn strtod_dangling_exponent_marker_is_consumed() {
        let (v, used) = strtod(b"7e");
        assert!(close(v, 7.0));
        assert_eq!(used, 2);
    }

    #[test]
    fn strtof_narrows() {
        let (v, used) = strtof(b"1.5");
        assert_eq!(v, 1.5f32);
        assert_eq!(used, 3);
    }

    #[test]
    fn roundtrip_through_formatter_bases() {
        use crate::stdio::printf::{FmtArg, sprintf};

        for &(value, base, fmt) in &[
            (0xabcdi64, 16, b"%x" as &[u8]),
            (1234567, 10, b"%d"),
            (42, 10, b"%i"),
        ] {
            let mut out = [0u8; 32];
            let n = sprintf(&mut out, fmt, &[FmtArg::Int(value as i32)]);
            let (parsed, used) = strtoll(&out[..n], base);
            assert_eq!(parsed, value);
            assert_eq!(used, n);
        }
    }
}
