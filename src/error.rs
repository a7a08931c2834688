use std::{fmt, io, sync::Arc};

use thiserror::Error;

use crate::de::ValueKind;

/**
An error encountered while decoding.

Data errors carry the absolute offset in the byte stream they were raised at,
counting bytes the decoder has already discarded.
*/
#[derive(Debug, Clone, Error)]
pub enum Error {
    /**
    The source ran out of bytes in the middle of a value.
    */
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEndOfInput { offset: usize },
    /**
    A `null`, `true` or `false` literal was misspelled.
    */
    #[error("invalid literal at offset {offset}")]
    InvalidLiteral { offset: usize },
    /**
    A number had a malformed sign, digit run, fraction or exponent, or didn't fit.
    */
    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },
    /**
    A digit run or exponent indexed outside the power-of-ten table.
    */
    #[error("number at offset {offset} is out of the supported range")]
    ExponentOutOfRange { offset: usize },
    /**
    An object key wasn't a string, or wasn't followed by a `:`.
    */
    #[error("malformed object key at offset {offset}")]
    MalformedObjectKey { offset: usize },
    /**
    A string wasn't valid UTF-8 or contained an invalid escape sequence.
    */
    #[error("invalid string at offset {offset}")]
    InvalidString { offset: usize },
    /**
    Values were nested deeper than `decode_value` will follow.
    */
    #[error("values nested too deeply at offset {offset}")]
    RecursionLimitExceeded { offset: usize },
    /**
    The value's JSON type can't be decoded into the requested target.

    The value itself has been skipped, so decoding can continue after it.
    */
    #[error("cannot decode {found} at offset {offset} into {expected}")]
    InvalidTarget {
        expected: Target,
        found: ValueKind,
        offset: usize,
    },
    /**
    The underlying source failed.
    */
    #[error("failed to read from the source")]
    Io(#[source] Arc<io::Error>),
    /**
    An error raised by a caller-supplied capability.
    */
    #[error("{0}")]
    Message(String),
}

/**
The shape a decode call site expected.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Object,
    Array,
    String,
    Bool,
    Integer,
    Float,
}

impl Error {
    /**
    Raise an error from within an [`crate::UnmarshalObject`] or [`crate::UnmarshalArray`].
    */
    pub fn custom(msg: impl fmt::Display) -> Self {
        Error::Message(msg.to_string())
    }

    /**
    The absolute stream offset the error was raised at, if it came from the input data.
    */
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Error::UnexpectedEndOfInput { offset }
            | Error::InvalidLiteral { offset }
            | Error::InvalidNumber { offset }
            | Error::ExponentOutOfRange { offset }
            | Error::MalformedObjectKey { offset }
            | Error::InvalidString { offset }
            | Error::RecursionLimitExceeded { offset }
            | Error::InvalidTarget { offset, .. } => Some(offset),
            Error::Io(_) | Error::Message(_) => None,
        }
    }

    /**
    Whether this error leaves the decoder unusable until it's reset.

    Only type mismatches are recoverable; the mismatched value has already been skipped.
    */
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InvalidTarget { .. })
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Object => "an object",
            Target::Array => "an array",
            Target::String => "a string",
            Target::Bool => "a bool",
            Target::Integer => "an integer",
            Target::Float => "a float",
        }
        .fmt(f)
    }
}
