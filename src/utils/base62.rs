//! Base62 conversion between record identifiers and public aliases.
//!
//! An alias is the positional base-62 representation of a record id, written
//! most-significant digit first with the alphabet `0-9A-Za-z`. There is no
//! padding, so every id has exactly one canonical alias.
//!
//! Decoding is the only place inbound aliases are validated character by
//! character; everything downstream works with the decoded integer.

/// Digits in value order: `ALPHABET[i]` is the character for digit `i`.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = ALPHABET.len() as u64;

/// Longest alias a `u64` can produce (`62^10 < 2^64 < 62^11`).
pub const MAX_ALIAS_LEN: usize = 11;

/// Errors returned by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base62Error {
    #[error("alias is empty")]
    Empty,

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("alias does not fit in 64 bits")]
    Overflow,
}

/// Encodes an identifier as a Base62 alias.
///
/// Record ids start at 1; `0` encodes to `"0"` but is never produced by a store.
///
/// # Examples
///
/// ```
/// use base62_shortener::utils::base62::encode;
///
/// assert_eq!(encode(1), "1");
/// assert_eq!(encode(62), "10");
/// assert_eq!(encode(63), "11");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(MAX_ALIAS_LEN);
    let mut rest = id;
    while rest > 0 {
        digits.push(ALPHABET[(rest % BASE) as usize]);
        rest /= BASE;
    }
    digits.reverse();

    // Every byte comes from ALPHABET, which is ASCII.
    digits.into_iter().map(char::from).collect()
}

/// Decodes a Base62 alias back into its identifier.
///
/// # Errors
///
/// - [`Base62Error::Empty`] for a zero-length input
/// - [`Base62Error::InvalidCharacter`] for anything outside `0-9A-Za-z`
/// - [`Base62Error::Overflow`] when the value exceeds `u64::MAX`
///
/// # Examples
///
/// ```
/// use base62_shortener::utils::base62::{decode, Base62Error};
///
/// assert_eq!(decode("10"), Ok(62));
/// assert!(matches!(decode("a-b"), Err(Base62Error::InvalidCharacter { .. })));
/// ```
pub fn decode(alias: &str) -> Result<u64, Base62Error> {
    if alias.is_empty() {
        return Err(Base62Error::Empty);
    }

    alias
        .chars()
        .enumerate()
        .try_fold(0u64, |value, (position, character)| {
            let digit = digit_value(character)
                .ok_or(Base62Error::InvalidCharacter { character, position })?;

            value
                .checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or(Base62Error::Overflow)
        })
}

/// Returns `true` when `alias` is the canonical encoding of some identifier.
///
/// Rejects leading zeros (`"01"`), which decode fine but are never issued.
pub fn is_canonical(alias: &str) -> bool {
    decode(alias).is_ok_and(|id| encode(id) == alias)
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'A'..='Z' => c as u64 - 'A' as u64 + 10,
        'a'..='z' => c as u64 - 'a' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
