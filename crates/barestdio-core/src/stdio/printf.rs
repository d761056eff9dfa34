//! printf formatting engine.
//!
//! Interprets the `%[flags][width][length]conv` directive mini-language over
//! a template byte string, pulling typed values from an explicit argument
//! cursor (the safe stand-in for a C `va_list`) and writing rendered text to
//! an output sink. The sink either writes into a caller-supplied buffer or
//! discards bytes while counting them, so a count-only pass and a write pass
//! over the same arguments always agree on length.
//!
//! Supported conversions: `d i u x X p s c %`. Anything else is consumed and
//! silently dropped without taking an argument slot.

// ---------------------------------------------------------------------------
// Directive descriptor
// ---------------------------------------------------------------------------

/// Flags parsed from a format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub zero_pad: bool,     // leading '0' run
}

/// A parsed format directive. Rebuilt fresh at each `%` and discarded once
/// the directive has been emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    /// Minimum field width. Zero means no padding.
    pub width: usize,
    /// Set by the `ll` length qualifier; selects the split two-slot 64-bit
    /// rendering path for integer conversions.
    pub long_long: bool,
    pub conversion: u8,
}

// ---------------------------------------------------------------------------
// Argument cursor
// ---------------------------------------------------------------------------

/// One argument slot backing a format call.
///
/// Integer slots are 32 bits wide, matching the promoted-to-`int` calling
/// convention of the directive language. A 64-bit value for an `ll`
/// directive occupies two consecutive slots, most significant half first;
/// [`FmtArg::split_long_long`] builds that pair.
#[derive(Debug, Clone, Copy)]
pub enum FmtArg<'a> {
    Int(i32),
    Uint(u32),
    Char(u8),
    /// String argument. `None` renders as the literal text `(null)`.
    Str(Option<&'a [u8]>),
    Ptr(usize),
}

impl FmtArg<'_> {
    /// Splits a 64-bit value into the two-slot form consumed by an `ll`
    /// integer directive: high half first, low half second.
    pub fn split_long_long(value: u64) -> [FmtArg<'static>; 2] {
        [
            FmtArg::Uint((value >> 32) as u32),
            FmtArg::Uint(value as u32),
        ]
    }
}

/// Sequentially-consumed cursor over the caller's argument slots.
///
/// Each consuming directive advances the cursor exactly once, except the
/// split 64-bit path which advances it twice and `%%`/dropped directives
/// which do not advance it at all. A slot of the wrong kind (or a missing
/// slot) causes the directive to be dropped without advancing; the count
/// contract with the caller makes that a caller bug, not an engine error.
#[derive(Debug)]
pub struct ArgCursor<'a, 'v> {
    slots: &'a [FmtArg<'v>],
    next: usize,
}

impl<'a, 'v> ArgCursor<'a, 'v> {
    pub fn new(slots: &'a [FmtArg<'v>]) -> Self {
        ArgCursor { slots, next: 0 }
    }

    /// Number of slots consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }

    /// Takes the next slot as a 32-bit integer bit pattern. `Int`, `Uint`
    /// and `Char` slots all qualify (narrower values arrive widened).
    fn next_int(&mut self) -> Option<u32> {
        let v = match self.slots.get(self.next)? {
            FmtArg::Int(v) => *v as u32,
            FmtArg::Uint(v) => *v,
            FmtArg::Char(c) => *c as u32,
            _ => return None,
        };
        self.next += 1;
        Some(v)
    }

    /// Takes the next slot as a single byte (`Char`, or an `Int` narrowed
    /// back down, mirroring the widened-char calling convention).
    fn next_char(&mut self) -> Option<u8> {
        let c = match self.slots.get(self.next)? {
            FmtArg::Char(c) => *c,
            FmtArg::Int(v) => *v as u8,
            _ => return None,
        };
        self.next += 1;
        Some(c)
    }

    fn next_str(&mut self) -> Option<Option<&'v [u8]>> {
        let s = match self.slots.get(self.next)? {
            FmtArg::Str(s) => *s,
            _ => return None,
        };
        self.next += 1;
        Some(s)
    }

    fn next_ptr(&mut self) -> Option<usize> {
        let p = match self.slots.get(self.next)? {
            FmtArg::Ptr(p) => *p,
            _ => return None,
        };
        self.next += 1;
        Some(p)
    }
}

// ---------------------------------------------------------------------------
// Output sink
// ---------------------------------------------------------------------------

/// Append-only, single-pass output sink.
///
/// In buffer mode bytes land in the caller's slice until it is full; bytes
/// past the end are discarded but still counted, so the return value of a
/// format call is always the untruncated length. Discard mode counts only.
/// A trailing NUL terminator is written (when room remains) after the whole
/// template has been consumed; it is never counted.
#[derive(Debug)]
pub struct Sink<'a> {
    out: Option<&'a mut [u8]>,
    written: usize,
    count: usize,
}

impl<'a> Sink<'a> {
    /// Count-only sink: every byte is discarded.
    pub fn discard() -> Sink<'static> {
        Sink {
            out: None,
            written: 0,
            count: 0,
        }
    }

    /// Sink writing into `out`, truncating at its end.
    pub fn buffer(out: &'a mut [u8]) -> Self {
        Sink {
            out: Some(out),
            written: 0,
            count: 0,
        }
    }

    fn put(&mut self, byte: u8) {
        self.count += 1;
        if let Some(out) = self.out.as_deref_mut()
            && self.written < out.len()
        {
            out[self.written] = byte;
            self.written += 1;
        }
    }

    fn terminate(&mut self) {
        if let Some(out) = self.out.as_deref_mut()
            && self.written < out.len()
        {
            out[self.written] = 0;
        }
    }

    /// Characters produced so far (would-be length, ignoring truncation).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Bytes actually stored in the buffer (terminator excluded).
    pub fn written(&self) -> usize {
        self.written
    }
}

// ---------------------------------------------------------------------------
// Directive parser
// ---------------------------------------------------------------------------

/// Parse a single directive starting after the `%` character.
///
/// `fmt` points to the first byte AFTER `%`. Returns `(spec, bytes_consumed)`
/// or `None` when the template ends mid-directive. Grammar, strictly left to
/// right: one optional `-`, a run of `0`, decimal width digits, `l`/`ll`
/// then `h`/`hh` qualifiers, conversion byte. `h`, `hh` and a single `l` are
/// consumed but change nothing (narrow integers arrive already promoted).
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    let mut flags = FormatFlags::default();
    if pos < len && fmt[pos] == b'-' {
        flags.left_justify = true;
        pos += 1;
    }
    while pos < len && fmt[pos] == b'0' {
        flags.zero_pad = true;
        pos += 1;
    }
    // '-' wins over '0': left-justified fields pad with spaces.
    if flags.left_justify {
        flags.zero_pad = false;
    }

    let mut width = 0usize;
    while pos < len && fmt[pos].is_ascii_digit() {
        width = width
            .saturating_mul(10)
            .saturating_add((fmt[pos] - b'0') as usize);
        pos += 1;
    }

    let mut long_long = false;
    if pos < len && fmt[pos] == b'l' {
        pos += 1;
        if pos < len && fmt[pos] == b'l' {
            pos += 1;
            long_long = true;
        }
    }
    if pos < len && fmt[pos] == b'h' {
        pos += 1;
        if pos < len && fmt[pos] == b'h' {
            pos += 1;
        }
    }

    if pos >= len {
        return None;
    }
    let conversion = fmt[pos];
    pos += 1;

    Some((
        FormatSpec {
            flags,
            width,
            long_long,
            conversion,
        },
        pos,
    ))
}

// ---------------------------------------------------------------------------
// Core interpreter
// ---------------------------------------------------------------------------

/// Walk `format`, emitting literals verbatim and rendering one directive per
/// `%`. Returns the count of characters produced (valid in discard mode
/// too). A trailing NUL is written to buffer sinks once the template is
/// consumed.
pub fn pprint(sink: &mut Sink<'_>, format: &[u8], args: &mut ArgCursor<'_, '_>) -> usize {
    let mut pos = 0;
    let len = format.len();

    while pos < len {
        if format[pos] != b'%' {
            sink.put(format[pos]);
            pos += 1;
            continue;
        }
        pos += 1;
        if pos >= len {
            // Template truncated at a bare trailing '%'.
            break;
        }
        if format[pos] == b'%' {
            sink.put(b'%');
            pos += 1;
            continue;
        }
        match parse_format_spec(&format[pos..]) {
            Some((spec, used)) => {
                pos += used;
                emit_directive(sink, &spec, args);
            }
            None => break, // truncated mid-directive
        }
    }
    sink.terminate();
    sink.count
}

fn emit_directive(sink: &mut Sink<'_>, spec: &FormatSpec, args: &mut ArgCursor<'_, '_>) {
    match spec.conversion {
        b'd' | b'i' | b'u' | b'x' | b'X' => {
            let (base, uppercase, signed) = match spec.conversion {
                b'x' => (16u64, false, false),
                b'X' => (16, true, false),
                b'u' => (10, false, false),
                _ => (10, false, true),
            };
            if spec.long_long {
                emit_long_long(sink, spec, args, base, uppercase, signed);
            } else if let Some(v) = args.next_int() {
                format_int(sink, v, base, uppercase, signed, spec.width, spec.flags);
            }
        }
        b'p' => {
            if let Some(p) = args.next_ptr() {
                format_value(sink, p as u64, false, 16, true, spec.width, spec.flags);
            }
        }
        b's' => {
            if let Some(s) = args.next_str() {
                let content = s.unwrap_or(b"(null)");
                pad_and_emit(sink, content, spec.width, spec.flags);
            }
        }
        b'c' => {
            if let Some(c) = args.next_char() {
                pad_and_emit(sink, &[c], spec.width, spec.flags);
            }
        }
        // Unrecognized conversion: the directive is dropped and no
        // argument slot is consumed.
        _ => {}
    }
}

/// Split 64-bit rendering for `ll` integer directives.
///
/// Consumes two slots (high half, then low half) and concatenates two 32-bit
/// renderings: the high half bounded to a field width of at most 8, the low
/// half padded to whatever width remains. When the high half is zero and the
/// requested width fits in 8, the high rendering is skipped entirely so
/// small values print without a leading zero block. Hex values with width 16
/// come out exact; general decimal values do not — a documented
/// approximation, not a defect.
fn emit_long_long(
    sink: &mut Sink<'_>,
    spec: &FormatSpec,
    args: &mut ArgCursor<'_, '_>,
    base: u64,
    uppercase: bool,
    signed: bool,
) {
    let Some(hi) = args.next_int() else { return };
    let Some(lo) = args.next_int() else { return };

    let total = spec.width;
    let mut remaining = total;
    if !(hi == 0 && total <= 8) {
        let emitted = format_int(sink, hi, base, uppercase, signed, total.min(8), spec.flags);
        remaining = remaining.saturating_sub(emitted);
    }
    format_int(sink, lo, base, uppercase, signed, remaining, spec.flags);
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a 32-bit integer slot. Returns the characters emitted.
fn format_int(
    sink: &mut Sink<'_>,
    raw: u32,
    base: u64,
    uppercase: bool,
    signed: bool,
    width: usize,
    flags: FormatFlags,
) -> usize {
    let mut negative = false;
    let mut magnitude = raw as u64;
    // Only decimal signed conversions test the sign bit; negation happens
    // on the unsigned domain so i32::MIN survives.
    if signed && base == 10 && (raw as i32) < 0 {
        negative = true;
        magnitude = u64::from((raw as i32).unsigned_abs());
    }
    format_value(sink, magnitude, negative, base, uppercase, width, flags)
}

/// Shared magnitude renderer behind every integer/pointer conversion.
fn format_value(
    sink: &mut Sink<'_>,
    magnitude: u64,
    negative: bool,
    base: u64,
    uppercase: bool,
    width: usize,
    flags: FormatFlags,
) -> usize {
    let mut digits = [0u8; 24];
    let count = render_digits(magnitude, base, uppercase, &mut digits);
    let mut start = digits.len() - count;

    if negative {
        if width > 0 && flags.zero_pad {
            // Minus sign ahead of the zero padding keeps -000042 shaped
            // output.
            sink.put(b'-');
            return 1 + pad_and_emit(sink, &digits[start..], width - 1, flags);
        }
        start -= 1;
        digits[start] = b'-';
    }
    pad_and_emit(sink, &digits[start..], width, flags)
}

/// Render `value` right-aligned into the end of `buf`, returning the digit
/// count. The value 0 renders as the single digit `0` regardless of base.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 24]) -> usize {
    if value == 0 {
        buf[23] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = buf.len();
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    buf.len() - pos
}

/// Field-width primitive: emit `content` padded to `width`. Pad byte is `0`
/// iff the zero-pad flag is set (never when left-justified, the parser
/// normalizes that conflict); padding goes before the content unless
/// left-justify moves it after. Returns the characters emitted.
fn pad_and_emit(sink: &mut Sink<'_>, content: &[u8], width: usize, flags: FormatFlags) -> usize {
    let pad_len = width.saturating_sub(content.len());
    let pad_byte = if flags.zero_pad { b'0' } else { b' ' };

    if !flags.left_justify {
        for _ in 0..pad_len {
            sink.put(pad_byte);
        }
    }
    for &b in content {
        sink.put(b);
    }
    if flags.left_justify {
        for _ in 0..pad_len {
            sink.put(b' ');
        }
    }
    content.len() + pad_len
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format into `out`, returning the untruncated character count. A trailing
/// NUL is written when room remains; it is not counted.
pub fn sprintf(out: &mut [u8], format: &[u8], args: &[FmtArg<'_>]) -> usize {
    let mut sink = Sink::buffer(out);
    let mut cursor = ArgCursor::new(args);
    pprint(&mut sink, format, &mut cursor)
}

/// Capacity-bounded variant: at most `size` bytes of `out` are used
/// (terminator included). Excess output is discarded but still counted, so
/// the return value equals what [`sprintf`] would have produced.
pub fn snprintf(out: &mut [u8], size: usize, format: &[u8], args: &[FmtArg<'_>]) -> usize {
    let cap = size.min(out.len());
    let mut sink = Sink::buffer(&mut out[..cap]);
    let mut cursor = ArgCursor::new(args);
    pprint(&mut sink, format, &mut cursor)
}

/// Count-only pass: renders nothing, returns the length [`sprintf`] would
/// produce for the same template and arguments.
pub fn format_length(format: &[u8], args: &[FmtArg<'_>]) -> usize {
    let mut sink = Sink::discard();
    let mut cursor = ArgCursor::new(args);
    pprint(&mut sink, format, &mut cursor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
