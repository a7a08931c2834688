use std::io;

use squirrel_stream::Decoder;

/**
A reader that hands out a few bytes at a time, so values get split across window refills.
*/
struct Trickle<'a> {
    input: &'a [u8],
    chunk: usize,
}

impl<'a> io::Read for Trickle<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.chunk.min(buf.len()).min(self.input.len());

        buf[..read].copy_from_slice(&self.input[..read]);
        self.input = &self.input[read..];

        Ok(read)
    }
}

pub fn de(input: &[u8]) {
    // Make sure we don't panic when decoding or skipping values
    let whole = Decoder::from_slice(input).decode_value();

    let chunk = 1 + input.first().copied().unwrap_or_default() as usize % 7;
    let chunked = Decoder::with_capacity(Trickle { input, chunk }, 4).decode_value();

    let skipped = Decoder::from_slice(input).skip();

    match (&whole, &chunked) {
        // The window shouldn't change what gets decoded
        (Ok(whole), Ok(chunked)) => assert_eq!(whole, chunked),
        (Err(whole), Err(chunked)) => assert_eq!(whole.offset(), chunked.offset()),
        _ => panic!("decoding {:?} differed between a slice and a reader", input),
    }

    if whole.is_ok() {
        // Anything that decodes can also be skipped
        assert!(skipped.is_ok(), "{:?}", skipped);

        if let Ok(expected) = serde_json::from_slice::<serde_json::Value>(input) {
            assert_eq!(
                value_shape(&expected),
                value_shape(whole.as_ref().expect("checked above"))
            );
        }
    }
}

/**
The structure of a value with numbers erased.

Numbers are decoded with table arithmetic, so they may differ from `serde_json` in their last bits.
*/
fn value_shape(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Number(_) => Value::Null,
        Value::Array(arr) => Value::Array(arr.iter().map(value_shape).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_shape(v)))
                .collect(),
        ),
        v => v.clone(),
    }
}
