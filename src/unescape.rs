/*!
String unescaping for JSON strings.

The input is the raw content between a string's quotes, already checked to be UTF8.
Unescaping proceeds linearly, copying runs of plain text in bulk and only stopping
at `\`.

Unlike the scanner, which only needs to know where a string ends, this is where escapes
are actually validated. Anything other than the escapes JSON defines is an error.
*/

use std::str;

use crate::std_ext::char::try_from_utf16_surrogate_pair;

/**
The string contained an escape sequence that isn't valid JSON.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidEscape;

pub(crate) fn unescape(input: &str) -> Result<String, InvalidEscape> {
    let mut scan = Scan {
        input_offset: 0,
        start: 0,
    };

    let mut unescaped = Unescaped {
        buf: String::with_capacity(input.len()),
    };

    let bytes = input.as_bytes();

    while scan.input_offset < bytes.len() {
        if bytes[scan.input_offset] == b'\\' {
            interest_unescape(input, &mut scan, &mut unescaped)?;
        } else {
            scan.input_offset += 1;
        }
    }

    flush(input, bytes.len(), &mut scan, &mut unescaped);

    Ok(unescaped.buf)
}

struct Scan {
    /**
    The current byte offset into the input.
    */
    input_offset: usize,
    /**
    The position to start copying from.
    */
    start: usize,
}

struct Unescaped {
    buf: String,
}

/**
Copy the plain text between the last escape and `flush_to`.
*/
#[inline(always)]
fn flush(input: &str, flush_to: usize, scan: &mut Scan, unescaped: &mut Unescaped) {
    // if a string starts with an escape then we'll try flush 0 bytes
    if flush_to == scan.start {
        return;
    }

    test_assert!(flush_to > scan.start);

    // escapes begin with an ASCII `\`, so these are always char boundaries
    unescaped.buf.push_str(&input[scan.start..flush_to]);
    scan.start = flush_to;
}

/**
Unescape the sequence starting at the `\` under the input offset.

This leaves the input offset just past the sequence.
*/
#[inline]
fn interest_unescape(
    input: &str,
    scan: &mut Scan,
    unescaped: &mut Unescaped,
) -> Result<(), InvalidEscape> {
    let bytes = input.as_bytes();

    flush(input, scan.input_offset, scan, unescaped);

    let escaped = *bytes.get(scan.input_offset + 1).ok_or(InvalidEscape)?;

    let mut len = 2;
    match escaped {
        b'n' => unescaped.buf.push('\n'),
        b'"' => unescaped.buf.push('"'),
        b'\\' => unescaped.buf.push('\\'),
        b'/' => unescaped.buf.push('/'),
        b'r' => unescaped.buf.push('\r'),
        b't' => unescaped.buf.push('\t'),
        b'f' => unescaped.buf.push('\u{0c}'),
        b'b' => unescaped.buf.push('\u{08}'),
        b'u' => {
            let first = hex4(bytes, scan.input_offset + 2)?;
            len = 6;

            let ch = match first {
                // a high surrogate must be immediately followed by an escaped low surrogate
                0xD800..=0xDBFF => {
                    let next = scan.input_offset + 6;
                    if bytes.get(next..next + 2) != Some(b"\\u".as_slice()) {
                        return Err(InvalidEscape);
                    }

                    let second = hex4(bytes, next + 2)?;
                    len = 12;

                    try_from_utf16_surrogate_pair(first, second).map_err(|_| InvalidEscape)?
                }
                code => char::from_u32(code as u32).ok_or(InvalidEscape)?,
            };

            unescaped.buf.push(ch);
        }
        _ => return Err(InvalidEscape),
    }

    scan.input_offset += len;
    scan.start = scan.input_offset;

    Ok(())
}

/**
Read 4 hex digits starting at `from`.
*/
#[inline]
fn hex4(bytes: &[u8], from: usize) -> Result<u16, InvalidEscape> {
    let digits = bytes.get(from..from + 4).ok_or(InvalidEscape)?;
    let digits = str::from_utf8(digits).map_err(|_| InvalidEscape)?;

    // `from_str_radix` accepts a leading `+`
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InvalidEscape);
    }

    u16::from_str_radix(digits, 16).map_err(|_| InvalidEscape)
}
