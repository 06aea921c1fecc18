//! String key derivation for the strings binary.
//!
//! Keys are derived with an `h * 33 ^ byte` scheme seeded with 5381. Tooling around the engine calls
//! this "FNV-1", but the constants are not the FNV offset basis and prime, and the game expects
//! exactly these values.

use std::fmt;

const HASH_SEED: u32 = 5381;
const HASH_MULTIPLIER: u32 = 33;

/// Derive the 32 bit key for `data`.
///
/// ```
/// assert_eq!(flamethrower_loc::hash::hash(b""), 5381);
/// assert_eq!(flamethrower_loc::hash::hash("a"), 177_604);
/// ```
pub fn hash(data: impl AsRef<[u8]>) -> u32 {
    data.as_ref().iter().fold(HASH_SEED, |acc, &byte| {
        acc.wrapping_mul(HASH_MULTIPLIER) ^ u32::from(byte)
    })
}

/// Key used when importing strings
///
/// Labels are hashed with [`hash`], raw hashes are used as they are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringKey {
    /// An already derived key
    Hash(u32),
    /// A human readable label which still has to be hashed
    Label(String),
}

impl StringKey {
    /// Interpret text as written in string exports
    ///
    /// Eight hexadecimal digits, or up to eight following `0x`, are read as a raw hash. Anything else is a
    /// label.
    pub fn parse(text: &str) -> StringKey {
        let (digits, prefixed) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(digits) => (digits, true),
            None => (text, false),
        };

        let plausible = if prefixed {
            (1..=8).contains(&digits.len())
        } else {
            digits.len() == 8
        };

        if plausible && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            if let Ok(value) = u32::from_str_radix(digits, 16) {
                return StringKey::Hash(value);
            }
        }

        StringKey::Label(text.to_string())
    }

    /// The key as stored in the strings binary
    pub fn hashed(&self) -> u32 {
        match self {
            StringKey::Hash(value) => *value,
            StringKey::Label(label) => hash(label.as_bytes()),
        }
    }
}

impl From<u32> for StringKey {
    fn from(value: u32) -> Self {
        StringKey::Hash(value)
    }
}

impl From<&str> for StringKey {
    fn from(value: &str) -> Self {
        StringKey::Label(value.to_string())
    }
}

impl From<String> for StringKey {
    fn from(value: String) -> Self {
        StringKey::Label(value)
    }
}

impl fmt::Display for StringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringKey::Hash(value) => write!(f, "{:08X}", value),
            StringKey::Label(label) => f.write_str(label),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{hash, StringKey};

    #[test]
    fn empty_input_is_seed() {
        assert_eq!(hash(b""), 5381);
    }

    #[test]
    fn single_byte() {
        // 5381 * 33 ^ 0x61
        assert_eq!(hash(b"a"), (5381u32 * 33) ^ 0x61);
    }

    #[test]
    fn matches_unbounded_arithmetic() {
        let data = b"ID_M_MP_MAP_NAME_SUEZ";

        let mut expected: u128 = 5381;
        for &byte in data {
            expected = (expected * 33) ^ u128::from(byte);
        }

        assert_eq!(hash(data), (expected & 0xFFFF_FFFF) as u32);
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(hash("new_label"), hash(String::from("new_label")));
        assert_ne!(hash("new_label"), hash("new_label2"));
    }

    #[test]
    fn string_keys() {
        assert_eq!(StringKey::from(0x1234u32).hashed(), 0x1234);
        assert_eq!(StringKey::from("new_label").hashed(), hash(b"new_label"));
        assert_eq!(StringKey::from(0xABu32).to_string(), "000000AB");
    }

    #[test]
    fn parse_exported_keys() {
        assert_eq!(StringKey::parse("0A1B2C3D"), StringKey::Hash(0x0A1B2C3D));
        assert_eq!(StringKey::parse("0xff"), StringKey::Hash(0xFF));
        assert_eq!(StringKey::parse("cafe"), StringKey::Label("cafe".into()));
        assert_eq!(StringKey::parse("0x"), StringKey::Label("0x".into()));
        assert_eq!(
            StringKey::parse("ID_M_SUEZ"),
            StringKey::Label("ID_M_SUEZ".into())
        );
    }
}
