/*!
# `squirrel-stream`

## 🐿🌊

A streaming JSON decoder that reads straight into caller-supplied sinks. There's no
intermediate tree: a [`Decoder`] walks a growable byte window with a cursor, pulling
more bytes from a [`std::io::Read`] only when it runs out, and hands each object key to an
[`UnmarshalObject`] capability that decides what to do with the value.

Values the caller doesn't care about are skipped without being interpreted, and objects
that declare how many keys they want stop dispatching once they've got them.

```
use squirrel_stream::{Decoder, Error, UnmarshalObject};

#[derive(Default)]
struct Point {
    x: f64,
    y: f64,
}

impl UnmarshalObject for Point {
    fn expected_key_count(&self) -> usize {
        2
    }

    fn decode_field(&mut self, dec: &mut Decoder, key: &str) -> Result<(), Error> {
        match key {
            "x" => dec.decode_f64(&mut self.x),
            "y" => dec.decode_f64(&mut self.y),
            _ => Ok(()),
        }
    }
}

let mut dec = Decoder::from_slice(br#"{"x":1,"label":"origin","y":2.5e1}"#);
let mut point = Point::default();

dec.decode_object(&mut point)?;

assert_eq!(1.0, point.x);
assert_eq!(25.0, point.y);
# Ok::<(), Error>(())
```

## ⚠️ CAREFUL

Numbers are parsed with power-of-ten tables and integer digit accumulation rather than
a general text-to-float conversion. Results are reproducible across platforms, but they
aren't guaranteed to be the closest IEEE value to the text. Changes to the arithmetic in
`de::number` change decoded values, so they need to be made deliberately.

Reads from the window are unchecked in optimized builds. Set `SQUIRRELSTREAM_CHECKED`
to build a checked variant for fuzzing.
*/

#![deny(warnings)]
#![allow(clippy::question_mark)]

#[macro_use]
mod macros;

mod std_ext;

mod error;
mod unescape;
pub mod de;

pub use de::{
    decode_array_fn, decode_object_fn, DecodeArrayFn, DecodeObjectFn, Decoder, DetachedDecoder,
    UnmarshalArray, UnmarshalObject, ValueKind,
};
pub use error::{Error, Target};
