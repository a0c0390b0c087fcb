use crate::{
    base54::{ALPHABET, BASE, DECODE_TABLE, MAX_ENCODED_LEN, NO_VALUE},
    error::{Error, Result},
};

/// A stack buffer large enough for any encoded ID.
pub type Base54Buf = [u8; MAX_ENCODED_LEN];

/// Encodes `value` into the tail of `buf` and returns the encoded slice.
///
/// The output is the shortest representation with no leading zero symbol, so
/// its length varies between 1 and [`MAX_ENCODED_LEN`] characters. Nothing is
/// allocated.
///
/// # Errors
///
/// Returns [`Error::InvalidId`] if `value` is negative.
///
/// # Example
///
/// ```
/// use flake54::{Base54Buf, encode_base54_to_buf};
///
/// let mut buf = Base54Buf::default();
/// assert_eq!(encode_base54_to_buf(123_123_123, &mut buf).unwrap(), "nHW1a");
/// ```
#[inline]
pub fn encode_base54_to_buf(value: i64, buf: &mut Base54Buf) -> Result<&str> {
    let Ok(mut n) = u64::try_from(value) else {
        return Err(Error::InvalidId);
    };

    let mut start = MAX_ENCODED_LEN;
    loop {
        start -= 1;
        buf[start] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
        if n == 0 {
            break;
        }
    }

    let encoded = &buf[start..];
    // SAFETY: every byte written comes from `ALPHABET`, which is ASCII.
    Ok(unsafe { core::str::from_utf8_unchecked(encoded) })
}

/// Encodes `value` into an owned [`String`].
///
/// See [`encode_base54_to_buf`] for the allocation-free variant.
///
/// # Errors
///
/// Returns [`Error::InvalidId`] if `value` is negative.
pub fn encode_base54(value: i64) -> Result<String> {
    let mut buf = Base54Buf::default();
    encode_base54_to_buf(value, &mut buf).map(str::to_owned)
}

/// Decodes a base 54 string into its integer value.
///
/// Digits are accumulated most significant first (Horner's method). Every
/// multiply-add is overflow checked, so a string that does not fit in an
/// `i64` is always rejected rather than wrapping into a plausible value.
///
/// # Errors
///
/// - [`Error::InvalidLength`] if `encoded` is empty or longer than
///   [`MAX_ENCODED_LEN`]
/// - [`Error::InvalidByte`] on the first byte outside the alphabet
/// - [`Error::InvalidId`] if the value exceeds `i64::MAX`
///
/// # Example
///
/// ```
/// use flake54::{Error, decode_base54};
///
/// assert_eq!(decode_base54("6vF"), Ok(123_123));
/// assert_eq!(decode_base54("xZNmktHEz5H"), Err(Error::InvalidId));
/// ```
#[inline]
pub fn decode_base54(encoded: &str) -> Result<i64> {
    let bytes = encoded.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_ENCODED_LEN {
        return Err(Error::InvalidLength { len: bytes.len() });
    }

    let mut acc = 0_i64;
    for (index, &byte) in bytes.iter().enumerate() {
        let digit = DECODE_TABLE[byte as usize];
        if digit == NO_VALUE {
            return Err(Error::InvalidByte { byte, index });
        }
        acc = acc
            .checked_mul(BASE as i64)
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or(Error::InvalidId)?;
    }

    Ok(acc)
}
