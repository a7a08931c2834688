use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub struct CharTryFromSurrogateError {}

impl Error for CharTryFromSurrogateError {}

impl fmt::Display for CharTryFromSurrogateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        "invalid UTF-16 surrogate pair".fmt(f)
    }
}

/**
Combine a high and low UTF-16 surrogate into a `char`.

Fails unless `high` is in `D800..=DBFF` and `low` is in `DC00..=DFFF`.
*/
pub fn try_from_utf16_surrogate_pair(
    high: u16,
    low: u16,
) -> Result<char, CharTryFromSurrogateError> {
    if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
        return Err(CharTryFromSurrogateError {});
    }

    let code = ((high as u32 - 0xD800) << 10) + (low as u32 - 0xDC00) + 0x10000;

    char::from_u32(code).ok_or(CharTryFromSurrogateError {})
}
