use super::*;

/**
A caller-supplied capability for decoding the fields of a JSON object.
*/
pub trait UnmarshalObject {
    /**
    The number of keys this capability consumes.

    Once that many fields have been consumed, the rest of the object is skipped without
    offering its keys. `0` means every key in the object is offered.
    */
    fn expected_key_count(&self) -> usize;

    /**
    Decode the value for `key`.

    The capability either decodes exactly one value through `dec` or doesn't touch it,
    in which case the value is skipped.
    */
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &str) -> Result<(), Error>;
}

impl<'a, O: UnmarshalObject + ?Sized> UnmarshalObject for &'a mut O {
    fn expected_key_count(&self) -> usize {
        (**self).expected_key_count()
    }

    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &str) -> Result<(), Error> {
        (**self).decode_field(dec, key)
    }
}

/**
An [`UnmarshalObject`] that offers every key to a function.

See [`decode_object_fn`].
*/
#[derive(Debug, Clone, Copy)]
pub struct DecodeObjectFn<F>(F);

/**
Decode every field of an object with a function.

```
use squirrel_stream::{decode_object_fn, Decoder};

let mut dec = Decoder::from_slice(br#"{"a":1,"b":"two"}"#);
let mut a = 0;

dec.decode_object(&mut decode_object_fn(|dec, key| match key {
    "a" => dec.decode_i64(&mut a),
    _ => Ok(()),
}))?;

assert_eq!(1, a);
# Ok::<(), squirrel_stream::Error>(())
```
*/
pub fn decode_object_fn<F>(f: F) -> DecodeObjectFn<F>
where
    F: FnMut(&mut Decoder<'_>, &str) -> Result<(), Error>,
{
    DecodeObjectFn(f)
}

impl<F> UnmarshalObject for DecodeObjectFn<F>
where
    F: FnMut(&mut Decoder<'_>, &str) -> Result<(), Error>,
{
    #[inline]
    fn expected_key_count(&self) -> usize {
        0
    }

    #[inline]
    fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &str) -> Result<(), Error> {
        (self.0)(dec, key)
    }
}

impl<'src> Decoder<'src> {
    /**
    Decode an object, offering its keys to a capability.

    A `null` decodes as an object without keys.
    */
    pub fn decode_object<O: UnmarshalObject + ?Sized>(&mut self, obj: &mut O) -> Result<(), Error> {
        self.begin()?;
        let result = self.object_value(obj);
        self.end(result)
    }

    fn object_value<O: UnmarshalObject + ?Sized>(&mut self, obj: &mut O) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'{') => {
                self.cursor += 1;
                self.object_fields(obj)
            }
            Some(b'n') => self.literal(b"null"),
            Some(first) => self.mismatch(Target::Object, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    fn object_fields<O: UnmarshalObject + ?Sized>(&mut self, obj: &mut O) -> Result<(), Error> {
        let expected = obj.expected_key_count();
        let mut keys_done = 0;

        while expected == 0 || keys_done < expected {
            let key = match self.next_key()? {
                Some(key) => key,
                None => return Ok(()),
            };

            self.called = false;
            obj.decode_field(self, &key)?;

            if self.called {
                keys_done += 1;
            } else {
                self.skip_value()?;
            }
        }

        test_assert_eq!(expected, keys_done);

        // every expected key has been seen, but the cursor still needs to end up past the `}`
        self.skip_container(b'{', b'}')
    }
}
