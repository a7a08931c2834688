#![cfg(unstable)]
#![feature(test)]
extern crate test;

use squirrel_stream::{decode_object_fn, Decoder, DetachedDecoder, Error, UnmarshalObject};

use std::str;

/**
Picks the rendered message and level out of an event, ignoring everything else.
*/
#[derive(Default)]
struct Summary {
    message: String,
    level: String,
}

impl UnmarshalObject for Summary {
    fn expected_key_count(&self) -> usize {
        2
    }

    fn decode_field(&mut self, dec: &mut Decoder, key: &str) -> Result<(), Error> {
        match key {
            "@m" => dec.decode_string(&mut self.message),
            "@l" => dec.decode_string(&mut self.level),
            _ => Ok(()),
        }
    }
}

#[bench]
fn read_event_skip(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);
        dec.skip().unwrap();
    })
}

#[bench]
fn read_event_sparse(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);

        let mut summary = Summary::default();
        dec.decode_object(&mut summary).unwrap();

        summary.message
    })
}

#[bench]
fn read_event_every_key(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);

        let mut keys = 0;
        dec.decode_object(&mut decode_object_fn(|_, _| {
            keys += 1;
            Ok(())
        }))
        .unwrap();

        keys
    })
}

#[bench]
fn read_event_sparse_reader(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");
    let mut detached = Some(DetachedDecoder::default());

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::attach(&input[..], detached.take().unwrap());

        let mut summary = Summary::default();
        dec.decode_object(&mut summary).unwrap();

        detached = Some(dec.release());
        summary.message
    })
}

#[bench]
#[cfg(feature = "serde_json")]
fn read_event_value(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);
        dec.decode_value().unwrap()
    })
}

#[bench]
fn read_event_value_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn read_event_value_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: json::JsonValue = json::parse(str::from_utf8(input).unwrap()).unwrap();
        v
    })
}

#[bench]
fn read_event_sparse_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/event.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();

        let mut doc = match v {
            serde_json::Value::Object(doc) => doc,
            _ => panic!("expected a map"),
        };

        let m = match doc.remove("@m").unwrap() {
            serde_json::Value::String(m) => m,
            _ => panic!("expected a string"),
        };

        m
    })
}

#[bench]
fn read_numbers_f64(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/numbers.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);

        let mut sum = 0.0;
        dec.decode_array(&mut squirrel_stream::decode_array_fn(|dec| {
            let mut v = 0.0;
            dec.decode_f64(&mut v)?;

            sum += v;
            Ok(())
        }))
        .unwrap();

        sum
    })
}

#[bench]
fn read_numbers_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/numbers.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: Vec<f64> = serde_json::from_slice(input).unwrap();
        v.into_iter().sum::<f64>()
    })
}

#[bench]
fn read_escapes_every_key(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/escapes.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut dec = Decoder::from_slice(input);

        let mut keys = String::new();
        dec.decode_object(&mut decode_object_fn(|_, key| {
            keys.push_str(key);
            Ok(())
        }))
        .unwrap();

        keys
    })
}
