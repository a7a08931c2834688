use std::{borrow::Cow, str};

use super::*;

use crate::unescape::unescape;

impl<'src> Decoder<'src> {
    /**
    Decode a string, resolving any escape sequences.

    A `null` decodes as an empty string.
    */
    pub fn decode_string(&mut self, v: &mut String) -> Result<(), Error> {
        self.begin()?;
        let result = self.string_value(v);
        self.end(result)
    }

    fn string_value(&mut self, v: &mut String) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'"') => {
                self.cursor += 1;
                let (start, end) = self.string_bounds()?;

                match self.text(start, end) {
                    Some(text) => {
                        v.clear();
                        v.push_str(&text);

                        Ok(())
                    }
                    None => Err(self.invalid_string(start)),
                }
            }
            Some(b'n') => {
                self.literal(b"null")?;
                v.clear();

                Ok(())
            }
            Some(first) => self.mismatch(Target::String, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    /**
    Get the next key in the object being decoded.

    Whitespace and a single separating comma are skipped before the key, and the `:` following
    it is consumed. Returns `None` if the object closes instead.
    */
    pub(super) fn next_key(&mut self) -> Result<Option<String>, Error> {
        let mut comma = false;

        while self.has(self.cursor)? {
            match self.byte(self.cursor) {
                b' ' | b'\n' | b'\t' | b'\r' => self.cursor += 1,
                b',' if !comma => {
                    comma = true;
                    self.cursor += 1;
                }
                b'"' => {
                    self.cursor += 1;
                    let (start, end) = self.string_bounds()?;

                    self.key_colon()?;

                    return match self.text(start, end) {
                        Some(key) => Ok(Some(key.into_owned())),
                        None => Err(self.malformed_key(start)),
                    };
                }
                b'}' => {
                    self.cursor += 1;
                    return Ok(None);
                }
                _ => return Err(self.malformed_key(self.cursor)),
            }
        }

        Err(self.eof(self.cursor))
    }

    fn key_colon(&mut self) -> Result<(), Error> {
        while self.has(self.cursor)? {
            match self.byte(self.cursor) {
                b' ' | b'\n' | b'\t' | b'\r' => self.cursor += 1,
                b':' => {
                    self.cursor += 1;
                    return Ok(());
                }
                _ => return Err(self.malformed_key(self.cursor)),
            }
        }

        Err(self.eof(self.cursor))
    }

    /**
    Find the raw content of a string whose opening quote has already been consumed.

    Returns the half-open range of the content, still escaped, and leaves the cursor
    just past the closing quote.
    */
    pub(super) fn string_bounds(&mut self) -> Result<(usize, usize), Error> {
        let start = self.cursor;
        let end = self.string_end(start)?;

        self.cursor = end + 1;
        Ok((start, end))
    }

    /**
    Find the index of the quote that terminates a string whose content begins at `start`.
    */
    pub(super) fn string_end(&mut self, start: usize) -> Result<usize, Error> {
        let mut at = start;

        while self.has(at)? {
            // a quote preceded by an odd run of `\` is escaped
            if self.byte(at) == b'"' && self.backslashes_before(start, at) % 2 == 0 {
                return Ok(at);
            }

            at += 1;
        }

        Err(self.eof(at))
    }

    /**
    Count the run of `\` immediately before `at`, stopping at the start of the string.
    */
    #[inline]
    fn backslashes_before(&self, start: usize, at: usize) -> usize {
        let mut count = 0;
        let mut i = at;

        while i > start && self.byte(i - 1) == b'\\' {
            count += 1;
            i -= 1;
        }

        count
    }

    /**
    Get the text of a string's raw content, unescaping it if needed.

    Returns `None` if the content isn't UTF-8 or has invalid escapes.
    */
    fn text(&self, start: usize, end: usize) -> Option<Cow<'_, str>> {
        test_assert!(end <= self.length);

        let raw = str::from_utf8(&self.buf[start..end]).ok()?;

        if raw.as_bytes().contains(&b'\\') {
            unescape(raw).map(Cow::Owned).ok()
        } else {
            Some(Cow::Borrowed(raw))
        }
    }
}
