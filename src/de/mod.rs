/*!
Streaming decoding for JSON values.

A [`Decoder`] owns a byte window, a cursor into it, and the count of bytes in the window
that are valid. Everything else in this module moves through the window by index:

- `skip` advances past one value of any shape without interpreting it.
- `string` finds the end of quoted strings and object keys.
- `number` parses numbers using power-of-ten tables.
- `object` and `array` drive caller-supplied capabilities over containers.

When the cursor reaches the end of the valid bytes, the decoder pulls more from its source,
growing the window if it's full. The window is never compacted while a value is being
decoded, so indexes taken during a scan stay valid until the outermost decode call returns.
That's also why strings handed to callers are owned copies rather than views into the window.

Decoding isn't recursive for values that are skipped: containers are skipped by counting
their open and close markers.
*/

mod array;
mod literal;
mod number;
mod object;
mod skip;
mod string;

#[cfg(any(test, feature = "serde_json"))]
mod value;

use std::{
    fmt,
    io::{self, Read},
    mem,
};

use log::{debug, trace};

use crate::error::{Error, Target};

pub use self::{
    array::{decode_array_fn, DecodeArrayFn, UnmarshalArray},
    object::{decode_object_fn, DecodeObjectFn, UnmarshalObject},
};

/**
A decoder that reads JSON values from a byte source into caller-supplied targets.

A decoder is used by one caller at a time. It can read a sequence of sibling values from
the same source, like a stream of newline or comma separated documents, by calling one
of the `decode_*` methods for each.

# Errors

Errors are sticky: once a call fails, every later call returns the same error until the
decoder is [`reset`](Decoder::reset). The exception is [`Error::InvalidTarget`], where the
mismatched value has been skipped and decoding can carry on.

# Panics

Every method panics if the decoder has been [`release`](Decoder::release)d.
*/
pub struct Decoder<'src> {
    /**
    Where more bytes come from.

    Decoders built from slices don't have a source.
    */
    source: Option<Box<dyn Read + 'src>>,
    /**
    The decode window.

    Only bytes below `length` are valid.
    */
    buf: Vec<u8>,
    /**
    The index of the next unread byte in the window.
    */
    cursor: usize,
    /**
    The number of valid bytes in the window.
    */
    length: usize,
    /**
    The number of bytes discarded from the front of the window by compaction.
    */
    consumed: usize,
    /**
    Whether the source has reported it has no more bytes.
    */
    exhausted: bool,
    /**
    The error to surface from the next call.

    Fatal errors stay here until the decoder is reset. Type mismatches are taken when
    the outermost decode call completes.
    */
    pending_error: Option<Error>,
    lifecycle: Lifecycle,
    /**
    The number of public decode calls currently in flight.
    */
    depth: usize,
    /**
    Whether the last decode call consumed a value.

    Object and array decoding clear this before handing a key or element to a capability,
    and skip the value themselves if it's still clear afterwards.
    */
    called: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Fresh,
    InUse,
    Released,
}

/**
The allocation for a decode window that's been detached from a released decoder.

It can be re-used by future decoders. They don't need to read from the same source.
*/
#[derive(Debug, Default)]
pub struct DetachedDecoder {
    buf: Vec<u8>,
}

/**
The shape of a JSON value, as determined by its first byte.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl ValueKind {
    #[inline]
    fn of(first: u8) -> Option<Self> {
        match first {
            b'{' => Some(ValueKind::Object),
            b'[' => Some(ValueKind::Array),
            b'"' => Some(ValueKind::String),
            b'-' | b'0'..=b'9' => Some(ValueKind::Number),
            b't' | b'f' => Some(ValueKind::Bool),
            b'n' => Some(ValueKind::Null),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueKind::Object => "an object",
            ValueKind::Array => "an array",
            ValueKind::String => "a string",
            ValueKind::Number => "a number",
            ValueKind::Bool => "a bool",
            ValueKind::Null => "null",
        }
        .fmt(f)
    }
}

impl Decoder<'static> {
    /**
    Decode values from an in-memory buffer.

    The buffer is copied into the decoder's window.
    */
    pub fn from_slice(input: &[u8]) -> Self {
        let mut dec = Decoder::build(None, input.to_vec());
        dec.length = input.len();
        dec.exhausted = true;

        dec
    }
}

impl<'src> Decoder<'src> {
    /**
    The size of the window a decoder starts with when none is given.
    */
    pub const DEFAULT_CAPACITY: usize = 512;

    /**
    Decode values pulled from a reader.
    */
    pub fn new(source: impl Read + 'src) -> Self {
        Self::with_capacity(source, Self::DEFAULT_CAPACITY)
    }

    /**
    Decode values pulled from a reader, starting with a window of `capacity` bytes.

    The window doubles whenever it's full and more input is needed.
    */
    pub fn with_capacity(source: impl Read + 'src, capacity: usize) -> Self {
        Self::build(Some(Box::new(source)), vec![0; capacity])
    }

    /**
    Decode values pulled from a reader, re-using the window from a released decoder.
    */
    pub fn attach(source: impl Read + 'src, detached: DetachedDecoder) -> Self {
        let mut buf = detached.buf;
        if buf.is_empty() {
            buf.resize(Self::DEFAULT_CAPACITY, 0);
        }

        Self::build(Some(Box::new(source)), buf)
    }

    fn build(source: Option<Box<dyn Read + 'src>>, buf: Vec<u8>) -> Self {
        Decoder {
            source,
            buf,
            cursor: 0,
            length: 0,
            consumed: 0,
            exhausted: false,
            pending_error: None,
            lifecycle: Lifecycle::Fresh,
            depth: 0,
            called: false,
        }
    }

    /**
    Re-arm this decoder to read from a new source.

    The window allocation is kept, but everything read so far and any pending error is discarded.

    # Panics

    This method panics if it's called from within a capability while a value is being decoded.
    */
    pub fn reset(&mut self, source: impl Read + 'src) {
        debug!("resetting decoder at offset {}", self.offset());

        self.rearm(Some(Box::new(source)));
    }

    /**
    Re-arm this decoder to read from an in-memory buffer.
    */
    pub fn reset_from_slice(&mut self, input: &[u8]) {
        debug!("resetting decoder at offset {}", self.offset());

        self.rearm(None);
        self.buf.clear();
        self.buf.extend_from_slice(input);
        self.length = input.len();
        self.exhausted = true;
    }

    fn rearm(&mut self, source: Option<Box<dyn Read + 'src>>) {
        // indexes held by the calls in flight would point into the new input
        if self.depth > 0 {
            reset_in_flight();
        }

        if self.buf.is_empty() {
            self.buf.resize(Self::DEFAULT_CAPACITY, 0);
        }

        self.source = source;
        self.cursor = 0;
        self.length = 0;
        self.consumed = 0;
        self.exhausted = false;
        self.pending_error = None;
        self.lifecycle = Lifecycle::Fresh;
        self.depth = 0;
        self.called = false;
    }

    /**
    Release this decoder, detaching its window so it can be re-used.

    Any further use of this decoder will panic.
    */
    pub fn release(&mut self) -> DetachedDecoder {
        self.assert_usable();

        debug!("releasing decoder at offset {}", self.offset());

        self.lifecycle = Lifecycle::Released;
        self.source = None;
        self.cursor = 0;
        self.length = 0;
        self.exhausted = true;

        DetachedDecoder {
            buf: mem::take(&mut self.buf),
        }
    }

    /**
    Whether this decoder has been released.
    */
    pub fn is_released(&self) -> bool {
        self.lifecycle == Lifecycle::Released
    }

    /**
    The absolute offset of the next unread byte in the source.
    */
    #[inline]
    pub fn offset(&self) -> usize {
        self.consumed + self.cursor
    }

    #[cfg(test)]
    pub(crate) fn window_len(&self) -> usize {
        self.buf.len()
    }

    /**
    Skip the next value, whatever its shape, without interpreting it.
    */
    pub fn skip(&mut self) -> Result<(), Error> {
        self.begin()?;
        let result = self.skip_value();
        self.end(result)
    }

    /**
    Look at the shape of the next value without consuming it.

    Whitespace and commas before the value are consumed.
    Returns `None` when the source has no more values.
    */
    pub fn peek_kind(&mut self) -> Result<Option<ValueKind>, Error> {
        self.check_usable()?;

        let result = match self.next_significant() {
            Ok(Some(b)) => match ValueKind::of(b) {
                Some(kind) => Ok(Some(kind)),
                None => Err(self.invalid_literal(self.cursor)),
            },
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };

        result.map_err(|err| self.fail(err))
    }

    /**
    Begin a public decode call.
    */
    #[inline]
    fn begin(&mut self) -> Result<(), Error> {
        self.check_usable()?;

        // compacting is only safe when no scan is holding indexes into the window
        if self.depth == 0 {
            self.compact();
        }

        self.lifecycle = Lifecycle::InUse;
        self.depth += 1;

        Ok(())
    }

    /**
    Complete a public decode call, surfacing any recorded mismatch if it's the outermost one.
    */
    #[inline]
    fn end(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        test_assert!(self.depth > 0);
        self.depth -= 1;

        match result {
            Ok(()) => {
                self.called = true;

                if self.depth == 0 {
                    if let Some(err) = self.pending_error.as_ref() {
                        let err = err.clone();
                        if !err.is_fatal() {
                            self.pending_error = None;
                        }

                        return Err(err);
                    }
                }

                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    #[inline]
    fn check_usable(&self) -> Result<(), Error> {
        self.assert_usable();

        match self.pending_error {
            Some(ref err) if err.is_fatal() => Err(err.clone()),
            _ => Ok(()),
        }
    }

    #[inline]
    fn assert_usable(&self) {
        if self.lifecycle == Lifecycle::Released {
            invalid_usage();
        }
    }

    /**
    Make a fatal error sticky.
    */
    #[cold]
    fn fail(&mut self, err: Error) -> Error {
        if err.is_fatal() {
            self.pending_error = Some(err.clone());
        }

        err
    }

    /**
    Record a type mismatch at the cursor and skip the offending value.

    The mismatch is surfaced when the outermost decode call completes, so an enclosing
    object or array keeps going with its remaining values.
    */
    #[cold]
    fn mismatch(&mut self, expected: Target, first: u8) -> Result<(), Error> {
        let found = match ValueKind::of(first) {
            Some(found) => found,
            None => return Err(self.invalid_literal(self.cursor)),
        };

        let offset = self.offset();
        debug!(
            "cannot decode {} at offset {} into {}; skipping it",
            found, offset, expected
        );

        if self.pending_error.is_none() {
            self.pending_error = Some(Error::InvalidTarget {
                expected,
                found,
                offset,
            });
        }

        self.skip_value()
    }

    /**
    Read the byte at `at`.

    Callers must have checked `at` is below `length`.
    */
    #[inline(always)]
    fn byte(&self, at: usize) -> u8 {
        test_assert!(at < self.length);
        test_assert!(self.length <= self.buf.len());

        window_byte!(self.buf, at)
    }

    /**
    Whether the byte at `at` is available, pulling more input until it is or the source is exhausted.
    */
    #[inline]
    fn has(&mut self, at: usize) -> Result<bool, Error> {
        while at >= self.length {
            if !self.advance()? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /**
    The byte at the cursor, if there is one.
    */
    #[inline]
    fn peek(&mut self) -> Result<Option<u8>, Error> {
        if self.has(self.cursor)? {
            Ok(Some(self.byte(self.cursor)))
        } else {
            Ok(None)
        }
    }

    /**
    Skip whitespace and separating commas, returning the byte after them without consuming it.
    */
    #[inline]
    fn next_significant(&mut self) -> Result<Option<u8>, Error> {
        while self.has(self.cursor)? {
            match self.byte(self.cursor) {
                b' ' | b'\n' | b'\t' | b'\r' | b',' => self.cursor += 1,
                b => return Ok(Some(b)),
            }
        }

        Ok(None)
    }

    /**
    Pull more bytes from the source into the window.

    Returns whether any bytes were appended.
    */
    fn advance(&mut self) -> Result<bool, Error> {
        if self.exhausted {
            return Ok(false);
        }

        let source = match self.source.as_mut() {
            Some(source) => source,
            None => {
                self.exhausted = true;
                return Ok(false);
            }
        };

        if self.length == self.buf.len() {
            let grow_to = if self.buf.is_empty() {
                Self::DEFAULT_CAPACITY
            } else {
                self.buf.len() * 2
            };

            trace!(
                "growing decode window from {} to {} bytes",
                self.buf.len(),
                grow_to
            );
            self.buf.resize(grow_to, 0);
        }

        loop {
            match source.read(&mut self.buf[self.length..]) {
                Ok(0) => {
                    trace!("source exhausted at offset {}", self.consumed + self.length);

                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(read) => {
                    trace!("pulled {} bytes into the decode window", read);

                    self.length += read;
                    return Ok(true);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /**
    Discard consumed bytes from the front of the window.

    Slices are never compacted; their window is exactly the input.
    */
    fn compact(&mut self) {
        if self.source.is_none() || self.cursor == 0 {
            return;
        }

        // HEURISTIC: only shift the window once at least half of it is garbage
        if self.cursor < self.length && self.cursor < self.buf.len() / 2 {
            return;
        }

        trace!("discarding {} consumed bytes from the decode window", self.cursor);

        self.buf.copy_within(self.cursor..self.length, 0);
        self.length -= self.cursor;
        self.consumed += self.cursor;
        self.cursor = 0;
    }

    #[cold]
    fn eof(&self, at: usize) -> Error {
        Error::UnexpectedEndOfInput {
            offset: self.consumed + at,
        }
    }

    #[cold]
    fn invalid_literal(&self, at: usize) -> Error {
        Error::InvalidLiteral {
            offset: self.consumed + at,
        }
    }

    #[cold]
    fn invalid_number(&self, at: usize) -> Error {
        Error::InvalidNumber {
            offset: self.consumed + at,
        }
    }

    #[cold]
    fn out_of_range(&self, at: usize) -> Error {
        Error::ExponentOutOfRange {
            offset: self.consumed + at,
        }
    }

    #[cold]
    fn malformed_key(&self, at: usize) -> Error {
        Error::MalformedObjectKey {
            offset: self.consumed + at,
        }
    }

    #[cold]
    #[cfg(any(test, feature = "serde_json"))]
    fn too_deep(&self, at: usize) -> Error {
        Error::RecursionLimitExceeded {
            offset: self.consumed + at,
        }
    }

    #[cold]
    fn invalid_string(&self, at: usize) -> Error {
        Error::InvalidString {
            offset: self.consumed + at,
        }
    }
}

impl<'src> fmt::Debug for Decoder<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let unread = self.buf.get(self.cursor..self.length).unwrap_or_default();

        f.debug_struct("Decoder")
            .field("unread", &String::from_utf8_lossy(unread))
            .field("offset", &self.offset())
            .field("exhausted", &self.exhausted)
            .field("pending_error", &self.pending_error)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

#[cold]
#[track_caller]
fn invalid_usage() -> ! {
    panic!("invalid usage of a released decoder")
}

#[cold]
#[track_caller]
fn reset_in_flight() -> ! {
    panic!("cannot reset a decoder while a value is being decoded")
}
