use super::*;

/**
A caller-supplied capability for decoding the elements of a JSON array.
*/
pub trait UnmarshalArray {
    /**
    Decode the next element.

    The capability either decodes exactly one value through `dec` or doesn't touch it,
    in which case the element is skipped.
    */
    fn decode_elem(&mut self, dec: &mut Decoder<'_>) -> Result<(), Error>;
}

impl<'a, A: UnmarshalArray + ?Sized> UnmarshalArray for &'a mut A {
    fn decode_elem(&mut self, dec: &mut Decoder<'_>) -> Result<(), Error> {
        (**self).decode_elem(dec)
    }
}

/**
An [`UnmarshalArray`] that offers every element to a function.

See [`decode_array_fn`].
*/
#[derive(Debug, Clone, Copy)]
pub struct DecodeArrayFn<F>(F);

/**
Decode every element of an array with a function.
*/
pub fn decode_array_fn<F>(f: F) -> DecodeArrayFn<F>
where
    F: FnMut(&mut Decoder<'_>) -> Result<(), Error>,
{
    DecodeArrayFn(f)
}

impl<F> UnmarshalArray for DecodeArrayFn<F>
where
    F: FnMut(&mut Decoder<'_>) -> Result<(), Error>,
{
    #[inline]
    fn decode_elem(&mut self, dec: &mut Decoder<'_>) -> Result<(), Error> {
        (self.0)(dec)
    }
}

impl<'src> Decoder<'src> {
    /**
    Decode an array, offering each of its elements to a capability.

    A `null` decodes as an array without elements.
    */
    pub fn decode_array<A: UnmarshalArray + ?Sized>(&mut self, arr: &mut A) -> Result<(), Error> {
        self.begin()?;
        let result = self.array_value(arr);
        self.end(result)
    }

    fn array_value<A: UnmarshalArray + ?Sized>(&mut self, arr: &mut A) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'[') => {
                self.cursor += 1;
                self.array_elems(arr)
            }
            Some(b'n') => self.literal(b"null"),
            Some(first) => self.mismatch(Target::Array, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    fn array_elems<A: UnmarshalArray + ?Sized>(&mut self, arr: &mut A) -> Result<(), Error> {
        loop {
            match self.next_significant()? {
                Some(b']') => {
                    self.cursor += 1;
                    return Ok(());
                }
                Some(_) => {
                    self.called = false;
                    arr.decode_elem(self)?;

                    if !self.called {
                        self.skip_value()?;
                    }
                }
                None => return Err(self.eof(self.cursor)),
            }
        }
    }
}
