/*!
Number parsing.

Numbers are parsed in two steps. First their structure is scanned: an optional `-`,
a run of integer digits, an optional `.` and run of fractional digits, and an optional
exponent. Skipping a number stops there.

Decoding then accumulates the digit runs into integers and scales them using a table of
powers of ten. There's no general text-to-float conversion involved, so results are the
same everywhere, but a digit run or exponent that's too long for the table is an error
rather than being rounded.
*/

use std::ops::{Div, Mul, Neg};

use super::*;

/**
Powers of ten, indexed by the length of a fractional digit run or the magnitude of an exponent.
*/
const POW10: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/**
A half-open range of digits in the window.
*/
#[derive(Debug, Clone, Copy)]
pub(super) struct Digits {
    start: usize,
    end: usize,
}

impl Digits {
    #[inline]
    fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/**
The structure of a number scanned from the window.
*/
#[derive(Debug, Clone, Copy)]
pub(super) struct NumberSpan {
    /**
    Where the number starts, including any sign.
    */
    start: usize,
    negative: bool,
    integer: Digits,
    fraction: Option<Digits>,
    exponent: Option<(bool, Digits)>,
}

/**
The float widths numbers can be decoded into.

Both use the same arithmetic, just at different precisions.
*/
trait Float: Copy + Neg<Output = Self> + Div<Output = Self> + Mul<Output = Self> {
    const ZERO: Self;

    fn from_u64(v: u64) -> Self;
}

impl Float for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_u64(v: u64) -> Self {
        v as f64
    }
}

impl Float for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_u64(v: u64) -> Self {
        v as f32
    }
}

impl<'src> Decoder<'src> {
    /**
    Decode a number into a 64bit float.

    A `null` decodes as `0.0`.
    */
    pub fn decode_f64(&mut self, v: &mut f64) -> Result<(), Error> {
        self.begin()?;
        let result = self.float_value(v);
        self.end(result)
    }

    /**
    Decode a number into a 32bit float.

    A `null` decodes as `0.0`.
    */
    pub fn decode_f32(&mut self, v: &mut f32) -> Result<(), Error> {
        self.begin()?;
        let result = self.float_value(v);
        self.end(result)
    }

    /**
    Decode a number into a 64bit integer.

    Any fractional part that remains after applying the exponent is truncated.
    A `null` decodes as `0`.
    */
    pub fn decode_i64(&mut self, v: &mut i64) -> Result<(), Error> {
        self.begin()?;
        let result = self.int_value(v);
        self.end(result)
    }

    fn float_value<F: Float>(&mut self, v: &mut F) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'-' | b'0'..=b'9') => {
                let span = self.number_span()?;
                *v = self.to_float(&span)?;

                Ok(())
            }
            Some(b'n') => {
                self.literal(b"null")?;
                *v = F::ZERO;

                Ok(())
            }
            Some(first) => self.mismatch(Target::Float, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    fn int_value(&mut self, v: &mut i64) -> Result<(), Error> {
        match self.next_significant()? {
            Some(b'-' | b'0'..=b'9') => {
                let span = self.number_span()?;
                *v = self.to_int(&span)?;

                Ok(())
            }
            Some(b'n') => {
                self.literal(b"null")?;
                *v = 0;

                Ok(())
            }
            Some(first) => self.mismatch(Target::Integer, first),
            None => Err(self.eof(self.cursor)),
        }
    }

    /**
    Scan the structure of a number starting at the cursor, leaving the cursor just past it.

    The cursor must be on a `-` or a digit.
    */
    pub(super) fn number_span(&mut self) -> Result<NumberSpan, Error> {
        let start = self.cursor;

        let negative = self.peek()? == Some(b'-');
        if negative {
            self.cursor += 1;
        }

        let integer = self.digits()?;
        if integer.is_empty() {
            return Err(self.invalid_number(self.cursor));
        }

        // leading zeros aren't allowed
        if integer.len() > 1 && self.byte(integer.start) == b'0' {
            return Err(self.invalid_number(integer.start));
        }

        let fraction = if self.peek()? == Some(b'.') {
            self.cursor += 1;

            let fraction = self.digits()?;
            if fraction.is_empty() {
                return Err(self.invalid_number(self.cursor));
            }

            Some(fraction)
        } else {
            None
        };

        let exponent = if let Some(b'e' | b'E') = self.peek()? {
            self.cursor += 1;

            let negative = match self.peek()? {
                Some(b'-') => {
                    self.cursor += 1;
                    true
                }
                Some(b'+') => {
                    self.cursor += 1;
                    false
                }
                _ => false,
            };

            let exponent = self.digits()?;
            if exponent.is_empty() {
                return Err(self.invalid_number(self.cursor));
            }

            Some((negative, exponent))
        } else {
            None
        };

        // the number must be followed by a delimiter or the end of the input
        match self.peek()? {
            None | Some(b' ' | b'\n' | b'\t' | b'\r' | b',' | b'}' | b']') => Ok(NumberSpan {
                start,
                negative,
                integer,
                fraction,
                exponent,
            }),
            Some(_) => Err(self.invalid_number(self.cursor)),
        }
    }

    #[inline]
    fn digits(&mut self) -> Result<Digits, Error> {
        let start = self.cursor;

        while self.has(self.cursor)? && self.byte(self.cursor).is_ascii_digit() {
            self.cursor += 1;
        }

        Ok(Digits {
            start,
            end: self.cursor,
        })
    }

    /**
    Accumulate a run of digits into an integer.

    Returns `None` if the run doesn't fit.
    */
    #[inline]
    fn accumulate(&self, digits: Digits) -> Option<u64> {
        let mut value = 0u64;

        for at in digits.start..digits.end {
            if value > u64::MAX / 10 {
                return None;
            }

            // `x * 10` as `x * 8 + x * 2`
            value = (value << 3) + (value << 1);
            value = value.checked_add((self.byte(at) - b'0') as u64)?;
        }

        Some(value)
    }

    /**
    Combine the integer and fractional digits into a single mantissa.

    Returns the mantissa along with the number of fractional digits it contains.
    */
    fn mantissa(&self, span: &NumberSpan) -> Result<(u64, usize), Error> {
        let integer = self
            .accumulate(span.integer)
            .ok_or_else(|| self.invalid_number(span.start))?;

        let fraction = match span.fraction {
            Some(fraction) => fraction,
            None => return Ok((integer, 0)),
        };

        let scale = *POW10
            .get(fraction.len())
            .ok_or_else(|| self.out_of_range(fraction.start))?;

        let mantissa = self
            .accumulate(fraction)
            .and_then(|fraction| integer.checked_mul(scale)?.checked_add(fraction))
            .ok_or_else(|| self.invalid_number(span.start))?;

        Ok((mantissa, fraction.len()))
    }

    /**
    The signed magnitude of the exponent, if there is one.
    */
    fn exponent(&self, span: &NumberSpan) -> Result<Option<(bool, usize)>, Error> {
        let (negative, digits) = match span.exponent {
            Some(exponent) => exponent,
            None => return Ok(None),
        };

        let magnitude = self
            .accumulate(digits)
            .and_then(|magnitude| usize::try_from(magnitude).ok())
            .filter(|magnitude| *magnitude < POW10.len())
            .ok_or_else(|| self.out_of_range(digits.start))?;

        Ok(Some((negative, magnitude)))
    }

    fn to_float<F: Float>(&self, span: &NumberSpan) -> Result<F, Error> {
        let (mantissa, scale) = self.mantissa(span)?;

        let mut value = F::from_u64(mantissa) / F::from_u64(POW10[scale]);

        match self.exponent(span)? {
            Some((true, magnitude)) => value = value / F::from_u64(POW10[magnitude]),
            Some((false, magnitude)) => value = value * F::from_u64(POW10[magnitude]),
            None => (),
        }

        Ok(if span.negative { -value } else { value })
    }

    fn to_int(&self, span: &NumberSpan) -> Result<i64, Error> {
        let (mantissa, scale) = self.mantissa(span)?;

        // the decimal point moves right by the exponent and left by the fraction length
        let shift = match self.exponent(span)? {
            Some((true, magnitude)) => -(magnitude as isize) - scale as isize,
            Some((false, magnitude)) => magnitude as isize - scale as isize,
            None => -(scale as isize),
        };

        let magnitude = if shift < 0 {
            // every `u64` is below 10^20, so shifting past the table truncates to zero
            match POW10.get(shift.unsigned_abs()) {
                Some(pow) => mantissa / pow,
                None => 0,
            }
        } else {
            let pow = *POW10
                .get(shift.unsigned_abs())
                .ok_or_else(|| self.out_of_range(span.start))?;

            mantissa
                .checked_mul(pow)
                .ok_or_else(|| self.invalid_number(span.start))?
        };

        if span.negative {
            if magnitude > i64::MIN.unsigned_abs() {
                return Err(self.invalid_number(span.start));
            }

            Ok((magnitude as i64).wrapping_neg())
        } else {
            i64::try_from(magnitude).map_err(|_| self.invalid_number(span.start))
        }
    }

    /**
    Convert a scanned number into a `serde_json::Number`.

    Numbers without a fraction or exponent are kept as integers.
    */
    #[cfg(any(test, feature = "serde_json"))]
    pub(super) fn to_json_number(&self, span: &NumberSpan) -> Result<serde_json::Number, Error> {
        if span.fraction.is_none() && span.exponent.is_none() {
            if span.negative {
                return self.to_int(span).map(serde_json::Number::from);
            }

            return self
                .accumulate(span.integer)
                .map(serde_json::Number::from)
                .ok_or_else(|| self.invalid_number(span.start));
        }

        let value: f64 = self.to_float(span)?;
        serde_json::Number::from_f64(value).ok_or_else(|| self.invalid_number(span.start))
    }
}
