use super::*;

impl<'src> Decoder<'src> {
    /**
    Decode a `true` or `false`.

    A `null` decodes as `false`.
    */
    pub fn decode_bool(&mut self, v: &mut bool) -> Result<(), Error> {
        self.begin()?;
        let result = self.bool_value(v);
        self.end(result)
    }

    fn bool_value(&mut self, v: &mut bool) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b't') => {
                self.literal(b"true")?;
                *v = true;

                Ok(())
            }
            Some(b'f') => {
                self.literal(b"false")?;
                *v = false;

                Ok(())
            }
            Some(b'n') => {
                self.literal(b"null")?;
                *v = false;

                Ok(())
            }
            Some(first) => self.mismatch(Target::Bool, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    /**
    Match an exact literal starting at the cursor, leaving the cursor just past it.
    */
    pub(super) fn literal(&mut self, expected: &'static [u8]) -> Result<(), Error> {
        let start = self.cursor;

        for (i, b) in expected.iter().enumerate() {
            let at = start + i;

            if !self.has(at)? {
                return Err(self.eof(at));
            }

            if self.byte(at) != *b {
                return Err(self.invalid_literal(at));
            }
        }

        self.cursor = start + expected.len();
        Ok(())
    }
}
