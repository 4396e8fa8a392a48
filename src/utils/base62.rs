//! Fixed-width base-62 identifier codec.
//!
//! Every issued identifier is published as an exactly six character code over
//! the alphabet `a-z A-Z 0-9`, in that concatenation order. The alphabet
//! ordering is part of the wire contract: codes are not portable across
//! reorderings.
//!
//! The codec is a bijection over `1..CAPACITY`. Identifiers outside that
//! range are rejected rather than truncated, so two distinct identifiers can
//! never share a code.

/// Encoding alphabet, indexed by base-62 digit value.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed width of every short code.
pub const CODE_LEN: usize = 6;

const BASE: u64 = ALPHABET.len() as u64;

/// Number of encodable identifiers: `62^6`.
///
/// The first identifier is 1, so valid input is `1..CAPACITY`.
pub const CAPACITY: u64 = BASE.pow(CODE_LEN as u32);

/// Errors produced by [`encode`] and [`decode`].
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The identifier is zero or does not fit in [`CODE_LEN`] digits.
    #[error("identifier {0} is outside the encodable range")]
    IdOutOfRange(u64),

    /// The code is not exactly [`CODE_LEN`] symbols long.
    #[error("expected a {CODE_LEN}-character code, got {0} characters")]
    InvalidLength(usize),

    /// The code contains a symbol outside the alphabet.
    #[error("symbol {0:?} is not in the code alphabet")]
    InvalidSymbol(char),
}

/// Encodes a positive identifier as a fixed-width short code.
///
/// Most-significant positions are padded with the zero symbol `'a'`, so
/// `encode(1)` yields `"aaaaab"`.
///
/// # Errors
///
/// Returns [`CodecError::IdOutOfRange`] when `id` is zero or `>= CAPACITY`.
pub fn encode(id: u64) -> Result<String, CodecError> {
    if id == 0 || id >= CAPACITY {
        return Err(CodecError::IdOutOfRange(id));
    }

    let mut digits = [0usize; CODE_LEN];
    let mut rest = id;
    for digit in digits.iter_mut().rev() {
        *digit = (rest % BASE) as usize;
        rest /= BASE;
    }

    Ok(digits.iter().map(|&d| ALPHABET[d] as char).collect())
}

/// Decodes a fixed-width short code back to its identifier.
///
/// Folds the symbols left to right as base-62 positional digits. A symbol
/// absent from the alphabet is an explicit error; it is never silently
/// folded into the accumulator.
///
/// # Errors
///
/// Returns [`CodecError::InvalidLength`] for codes that are not exactly
/// [`CODE_LEN`] characters and [`CodecError::InvalidSymbol`] for characters
/// outside the alphabet.
pub fn decode(code: &str) -> Result<u64, CodecError> {
    let len = code.chars().count();
    if len != CODE_LEN {
        return Err(CodecError::InvalidLength(len));
    }

    let mut acc: u64 = 0;
    for symbol in code.chars() {
        let value = symbol_value(symbol).ok_or(CodecError::InvalidSymbol(symbol))?;
        acc = acc * BASE + value;
    }

    Ok(acc)
}

/// Maps a symbol to its base-62 digit value, `None` outside the alphabet.
fn symbol_value(symbol: char) -> Option<u64> {
    match symbol {
        'a'..='z' => Some(symbol as u64 - 'a' as u64),
        'A'..='Z' => Some(symbol as u64 - 'A' as u64 + 26),
        '0'..='9' => Some(symbol as u64 - '0' as u64 + 52),
        _ => None,
    }
}
