use super::*;

use std::io::{self, Read};

use crate::{
    decode_array_fn, decode_object_fn, Decoder, Error, Target, UnmarshalObject, ValueKind,
};

fn decode_value_err(input: &[u8]) -> Vec<Error> {
    let mut errs = Vec::new();

    test_chunking(input, |mut dec| {
        errs.push(dec.decode_value().unwrap_err());
    });

    errs
}

macro_rules! assert_err {
    ($input:expr, $pat:pat) => {{
        for err in decode_value_err($input) {
            assert!(
                matches!(err, $pat),
                "{:?}: unexpected {:?}",
                String::from_utf8_lossy($input),
                err
            );
        }
    }};
}

#[test]
fn err_unexpected_end() {
    assert_err!(b"", Error::UnexpectedEndOfInput { offset: 0 });
    assert_err!(b"  \n", Error::UnexpectedEndOfInput { offset: 3 });
    assert_err!(b"{\"a\":", Error::UnexpectedEndOfInput { offset: 5 });
    assert_err!(b"{\"a\"", Error::UnexpectedEndOfInput { offset: 4 });
    assert_err!(b"{\"a", Error::UnexpectedEndOfInput { offset: 3 });
    assert_err!(b"{\"a\":1", Error::UnexpectedEndOfInput { offset: 6 });
    assert_err!(b"[1,2", Error::UnexpectedEndOfInput { offset: 4 });
    assert_err!(b"\"abc\\\"", Error::UnexpectedEndOfInput { offset: 6 });
    assert_err!(b"tru", Error::UnexpectedEndOfInput { offset: 3 });
}

#[test]
fn err_unexpected_end_while_skipping() {
    for input in [&b"{\"a\":[1,{\"b\":2}"[..], &b"[[[]]"[..], &b"\"}"[..]] {
        test_chunking(input, |mut dec| {
            let err = dec.skip().unwrap_err();

            assert!(
                matches!(err, Error::UnexpectedEndOfInput { offset } if offset == input.len()),
                "{:?}",
                err
            );
        });
    }
}

#[test]
fn err_invalid_literal() {
    assert_err!(b"nulL", Error::InvalidLiteral { offset: 3 });
    assert_err!(b"trve", Error::InvalidLiteral { offset: 1 });
    assert_err!(b"fals3", Error::InvalidLiteral { offset: 4 });
    assert_err!(b"@", Error::InvalidLiteral { offset: 0 });
    assert_err!(b"[1,@]", Error::InvalidLiteral { offset: 3 });
}

#[test]
fn err_invalid_literal_while_peeking() {
    let mut dec = Decoder::from_slice(b"  }");

    let err = dec.peek_kind().unwrap_err();
    assert!(matches!(err, Error::InvalidLiteral { offset: 2 }), "{:?}", err);
}

#[test]
fn err_invalid_number() {
    for (input, expected) in [
        ("-a", 1),
        ("-", 1),
        ("1.", 2),
        ("1.e5", 2),
        ("1e", 2),
        ("1e+", 3),
        ("12a", 2),
        ("012", 0),
        ("-01", 1),
        ("1.5.2", 3),
    ] {
        test_chunking(input.as_bytes(), |mut dec| {
            let mut v = 0.0;
            let err = dec.decode_f64(&mut v).unwrap_err();

            assert!(
                matches!(err, Error::InvalidNumber { offset } if offset == expected),
                "{}: {:?}",
                input,
                err
            );
        });
    }
}

#[test]
fn err_integer_overflow() {
    for input in ["9223372036854775808", "-9223372036854775809", "99999999999999999999"] {
        let mut dec = Decoder::from_slice(input.as_bytes());

        let mut v = 0;
        let err = dec.decode_i64(&mut v).unwrap_err();

        assert!(matches!(err, Error::InvalidNumber { offset: 0 }), "{}: {:?}", input, err);
    }
}

#[test]
fn err_exponent_out_of_range() {
    for (input, expected) in [
        ("1e20", 2),
        ("-1E-25", 4),
        ("0.12345678901234567890", 2),
    ] {
        test_chunking(input.as_bytes(), |mut dec| {
            let mut v = 0.0;
            let err = dec.decode_f64(&mut v).unwrap_err();

            assert!(
                matches!(err, Error::ExponentOutOfRange { offset } if offset == expected),
                "{}: {:?}",
                input,
                err
            );
        });
    }
}

#[test]
fn err_exponent_out_of_range_is_still_skippable() {
    // skipping only checks a number's structure
    let mut dec = Decoder::from_slice(b"1e20 1");
    dec.skip().unwrap();

    let mut v = 0;
    dec.decode_i64(&mut v).unwrap();
    assert_eq!(1, v);
}

#[test]
fn err_malformed_object_key() {
    assert_err!(b"{\"a\" 1}", Error::MalformedObjectKey { offset: 5 });
    assert_err!(b"{a:1}", Error::MalformedObjectKey { offset: 1 });
    assert_err!(b"{\"a\":1,,\"b\":2}", Error::MalformedObjectKey { offset: 7 });
    assert_err!(b"{\"\\x\":1}", Error::MalformedObjectKey { offset: 2 });
}

#[test]
fn err_invalid_string() {
    for input in [
        &b"\"\\x\""[..],
        &b"\"\\ud83d\""[..],
        &b"\"\\ud83d\\u0041\""[..],
        &b"\"\\u12g4\""[..],
        &b"\"\xff\""[..],
    ] {
        test_chunking(input, |mut dec| {
            let mut v = String::new();
            let err = dec.decode_string(&mut v).unwrap_err();

            assert!(
                matches!(err, Error::InvalidString { offset: 1 }),
                "{:?}: {:?}",
                String::from_utf8_lossy(input),
                err
            );
        });
    }
}

#[test]
fn err_first_mismatch_wins() {
    struct Pair {
        a: i64,
        b: bool,
        c: String,
    }

    impl UnmarshalObject for Pair {
        fn expected_key_count(&self) -> usize {
            3
        }

        fn decode_field(&mut self, dec: &mut Decoder, key: &str) -> Result<(), Error> {
            match key {
                "a" => dec.decode_i64(&mut self.a),
                "b" => dec.decode_bool(&mut self.b),
                "c" => dec.decode_string(&mut self.c),
                _ => Ok(()),
            }
        }
    }

    let input = b"{\"a\":[1],\"b\":{},\"c\":\"ok\"}";

    test_chunking(input, |mut dec| {
        let mut pair = Pair {
            a: 0,
            b: false,
            c: String::new(),
        };

        let err = dec.decode_object(&mut pair).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidTarget {
                expected: Target::Integer,
                found: ValueKind::Array,
                offset: 5,
            }
        ));
        assert_eq!("ok", pair.c);
        assert_eq!(input.len(), dec.offset());
    });
}

#[test]
fn err_mismatch_in_array() {
    let input = b"[1,\"two\",3] 4";

    test_chunking(input, |mut dec| {
        let mut values = Vec::new();

        let err = dec
            .decode_array(&mut decode_array_fn(|dec| {
                let mut v = 0;
                dec.decode_i64(&mut v)?;
                values.push(v);

                Ok(())
            }))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidTarget {
                expected: Target::Integer,
                found: ValueKind::String,
                offset: 3,
            }
        ));

        // the failed element was skipped, but still counted as handled
        assert_eq!(vec![1, 0, 3], values);

        let mut v = 0;
        dec.decode_i64(&mut v).unwrap();
        assert_eq!(4, v);
    });
}

#[test]
fn err_top_level_mismatches() {
    let mut dec = Decoder::from_slice(b"1 \"s\" true [] {}");

    let mut s = String::new();
    assert!(matches!(
        dec.decode_string(&mut s).unwrap_err(),
        Error::InvalidTarget {
            expected: Target::String,
            found: ValueKind::Number,
            offset: 0,
        }
    ));

    let mut b = false;
    assert!(matches!(
        dec.decode_bool(&mut b).unwrap_err(),
        Error::InvalidTarget {
            expected: Target::Bool,
            found: ValueKind::String,
            offset: 2,
        }
    ));

    assert!(matches!(
        dec.decode_object(&mut decode_object_fn(|_, _| Ok(()))).unwrap_err(),
        Error::InvalidTarget {
            expected: Target::Object,
            found: ValueKind::Bool,
            offset: 6,
        }
    ));

    let mut f = 0.0f32;
    assert!(matches!(
        dec.decode_f32(&mut f).unwrap_err(),
        Error::InvalidTarget {
            expected: Target::Float,
            found: ValueKind::Array,
            offset: 11,
        }
    ));

    assert!(matches!(
        dec.decode_array(&mut decode_array_fn(|_| Ok(()))).unwrap_err(),
        Error::InvalidTarget {
            expected: Target::Array,
            found: ValueKind::Object,
            offset: 14,
        }
    ));

    assert_eq!(None, dec.peek_kind().unwrap());
}

#[test]
fn err_is_sticky() {
    let mut dec = Decoder::from_slice(b"nul 1");

    let mut v = 0;
    let first = dec.decode_i64(&mut v).unwrap_err();
    let second = dec.decode_i64(&mut v).unwrap_err();

    assert!(matches!(first, Error::InvalidLiteral { offset: 3 }), "{:?}", first);
    assert!(matches!(second, Error::InvalidLiteral { offset: 3 }), "{:?}", second);

    assert!(dec.skip().is_err());
    assert!(dec.peek_kind().is_err());
}

#[test]
fn err_custom() {
    let mut dec = Decoder::from_slice(b"{\"a\":1,\"b\":2}");

    let err = dec
        .decode_object(&mut decode_object_fn(|_, key| match key {
            "b" => Err(Error::custom(format_args!("unexpected key {:?}", key))),
            _ => Ok(()),
        }))
        .unwrap_err();

    assert!(matches!(err, Error::Message(ref msg) if msg == "unexpected key \"b\""));
    assert_eq!(None, err.offset());

    // errors from capabilities are fatal too
    assert!(dec.skip().is_err());
}

#[test]
fn err_io() {
    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "the source is gone"))
        }
    }

    let mut dec = Decoder::new(Failing);

    let mut v = false;
    let err = dec.decode_bool(&mut v).unwrap_err();

    assert!(matches!(err, Error::Io(_)), "{:?}", err);
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn err_io_after_partial_read() {
    struct FailAfter<'a> {
        input: &'a [u8],
    }

    impl<'a> Read for FailAfter<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.input.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }

            self.input.read(buf)
        }
    }

    let mut dec = Decoder::with_capacity(FailAfter { input: b"[1,2," }, 4);

    let err = dec.skip().unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{:?}", err);
}

#[test]
fn err_nested_too_deeply() {
    let arrays = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
    for err in decode_value_err(arrays.as_bytes()) {
        assert!(matches!(err, Error::RecursionLimitExceeded { offset: 128 }), "{:?}", err);
    }

    let objects = format!("{}1{}", "{\"a\":".repeat(10_000), "}".repeat(10_000));
    for err in decode_value_err(objects.as_bytes()) {
        assert!(matches!(err, Error::RecursionLimitExceeded { offset: 640 }), "{:?}", err);
    }
}

#[test]
fn err_nested_too_deeply_is_sticky_but_skippable() {
    let input = format!("{}{} 1", "[".repeat(200), "]".repeat(200));

    let mut dec = Decoder::from_slice(input.as_bytes());
    assert!(dec.decode_value().is_err());
    assert!(dec.skip().is_err());

    // skipping counts brackets instead of descending into them
    dec.reset_from_slice(input.as_bytes());
    dec.skip().unwrap();

    let mut v = 0;
    dec.decode_i64(&mut v).unwrap();
    assert_eq!(1, v);
}

#[test]
#[should_panic(expected = "cannot reset a decoder while a value is being decoded")]
fn err_reset_while_decoding() {
    let mut dec = Decoder::from_slice(b"{\"a\":1}");

    let _ = dec.decode_object(&mut decode_object_fn(|dec, _| {
        dec.reset_from_slice(b"2");
        Ok(())
    }));
}

#[test]
#[should_panic(expected = "invalid usage of a released decoder")]
fn err_released() {
    let mut dec = Decoder::from_slice(b"1");
    let _ = dec.release();

    let mut v = 0;
    let _ = dec.decode_i64(&mut v);
}

#[test]
#[should_panic(expected = "invalid usage of a released decoder")]
fn err_released_twice() {
    let mut dec = Decoder::from_slice(b"1");

    let _ = dec.release();
    let _ = dec.release();
}
