use super::*;

impl<'src> Decoder<'src> {
    /**
    Advance the cursor past the next value without interpreting it.

    Literals and numbers are checked for well-formedness. Containers are only checked
    for balanced markers; their content isn't otherwise validated.
    */
    pub(super) fn skip_value(&mut self) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'n') => self.literal(b"null"),
            Some(b't') => self.literal(b"true"),
            Some(b'f') => self.literal(b"false"),
            Some(b'"') => {
                self.cursor += 1;
                self.string_bounds().map(drop)
            }
            Some(b'{') => {
                self.cursor += 1;
                self.skip_container(b'{', b'}')
            }
            Some(b'[') => {
                self.cursor += 1;
                self.skip_container(b'[', b']')
            }
            Some(b'-' | b'0'..=b'9') => self.number_span().map(drop),
            Some(_) => Err(self.invalid_literal(self.cursor)),
            None => Err(self.eof(self.cursor)),
        }
    }

    /**
    Skip the rest of a container whose opening marker has already been consumed.

    This leaves the cursor just past the matching close marker. Strings are skipped whole
    so markers inside them aren't counted.
    */
    pub(super) fn skip_container(&mut self, open: u8, close: u8) -> Result<(), Error> {
        let mut depth = 1usize;
        let mut at = self.cursor;

        while self.has(at)? {
            match self.byte(at) {
                b'"' => {
                    // continue from just past the closing quote
                    at = self.string_end(at + 1)? + 1;
                    continue;
                }
                b if b == open => depth += 1,
                b if b == close => {
                    depth -= 1;

                    if depth == 0 {
                        self.cursor = at + 1;
                        return Ok(());
                    }
                }
                _ => (),
            }

            at += 1;
        }

        Err(self.eof(at))
    }
}
