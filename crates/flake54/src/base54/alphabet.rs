/// The base 54 alphabet.
///
/// A scrambled permutation of `0123456789abcdefghjkmnprstuvwxyzACDEFGHJKLMNPQRTUVWXYZ`,
/// which drops look-alike glyphs (`i`, `l`, `o`, `q`, `B`, `I`, `O`, `S`).
/// Encoded IDs still sort in numeric order when compared digit by digit in
/// alphabet order, but plain lexical comparison of two strings says nothing
/// about which ID is older.
///
/// Changing this constant changes every encoded ID ever issued.
pub const ALPHABET: &[u8; BASE as usize] = b"g82FcYyTeUr0vsn1Jb9NmLMPuHGhVztRp4f3jDk5Zd6ECaw7AWQKXx";

/// Radix of the encoding.
pub const BASE: u64 = 54;

/// Longest possible encoding of a non-negative `i64`.
///
/// `54^10 < i64::MAX < 54^11`, so 11 symbols always suffice.
pub const MAX_ENCODED_LEN: usize = 11;

/// Marker for bytes that are not part of [`ALPHABET`].
pub const NO_VALUE: u8 = 0xFF;

/// Byte-indexed inverse of [`ALPHABET`].
///
/// Every entry is either the position of that byte in the alphabet or
/// [`NO_VALUE`].
pub const DECODE_TABLE: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while (i as u64) < BASE {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Returns the digit value of `byte`, or `None` if it is not in the alphabet.
#[inline]
pub const fn digit_of(byte: u8) -> Option<u8> {
    match DECODE_TABLE[byte as usize] {
        NO_VALUE => None,
        digit => Some(digit),
    }
}
