use serde_json::{Map, Value};

use super::*;

/**
The number of containers `decode_value` will descend into before giving up.
*/
const MAX_VALUE_DEPTH: usize = 128;

impl<'src> Decoder<'src> {
    /**
    Decode the next value of any shape into a [`serde_json::Value`].

    Numbers without a fraction or exponent are decoded as integers. Everything else
    goes through the same float parser as [`Decoder::decode_f64`].

    Containers nested more than 128 deep fail with [`Error::RecursionLimitExceeded`].
    */
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        self.nested_value(0)
    }

    fn nested_value(&mut self, depth: usize) -> Result<Value, Error> {
        self.begin()?;

        let mut value = Value::Null;
        let result = self.any_value(&mut value, depth);

        self.end(result).map(|()| value)
    }

    fn any_value(&mut self, value: &mut Value, depth: usize) -> Result<(), Error> {
        let first = self.next_significant()?;

        if let Some(b'{' | b'[') = first {
            if depth >= MAX_VALUE_DEPTH {
                return Err(self.too_deep(self.cursor));
            }
        }

        match first {
            Some(b'{') => {
                let mut map = Map::new();

                self.decode_object(&mut decode_object_fn(|dec, key| {
                    let value = dec.nested_value(depth + 1)?;
                    map.insert(key.to_owned(), value);

                    Ok(())
                }))?;

                *value = Value::Object(map);
            }
            Some(b'[') => {
                let mut arr = Vec::new();

                self.decode_array(&mut decode_array_fn(|dec| {
                    arr.push(dec.nested_value(depth + 1)?);

                    Ok(())
                }))?;

                *value = Value::Array(arr);
            }
            Some(b'"') => {
                let mut s = String::new();
                self.decode_string(&mut s)?;

                *value = Value::String(s);
            }
            Some(b't' | b'f') => {
                let mut b = false;
                self.decode_bool(&mut b)?;

                *value = Value::Bool(b);
            }
            Some(b'n') => {
                self.literal(b"null")?;

                *value = Value::Null;
            }
            Some(b'-' | b'0'..=b'9') => {
                let span = self.number_span()?;

                *value = Value::Number(self.to_json_number(&span)?);
            }
            Some(_) => return Err(self.invalid_literal(self.cursor)),
            None => return Err(self.eof(self.cursor)),
        }

        Ok(())
    }
}
