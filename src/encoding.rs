//! Base64 variant over the `./0-9A-Za-z` alphabet.
//!
//! Encoded strings never carry padding: the last two characters of the padded
//! form are always dropped, whether or not they are `=`. Salts are 16 bytes,
//! where exactly two pad characters are produced; longer outputs lose their
//! final real character and stored hashes depend on that.

use base64::{
    Engine,
    alphabet::CRYPT,
    engine::{GeneralPurpose, general_purpose::PAD},
};

/// The 64 symbols, in encoding order.
pub const ALPHABET: &str = "./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const ENGINE: GeneralPurpose = GeneralPurpose::new(&CRYPT, PAD);

/// Number of characters dropped from the padded encoding.
const STRIPPED: usize = 2;

/// Encodes `bytes` with the crypt alphabet and strips the trailing two characters.
pub fn encode(bytes: &[u8]) -> String {
    let mut encoded = ENGINE.encode(bytes);
    encoded.truncate(encoded.len().saturating_sub(STRIPPED));
    encoded
}

/// Length of `encode` output for `len` input bytes.
pub fn encoded_len(len: usize) -> usize {
    (len.div_ceil(3) * 4).saturating_sub(STRIPPED)
}

/// Returns `true` if `c` is one of the 64 alphabet symbols.
pub fn is_alphabet(c: char) -> bool {
    matches!(c, '.' | '/' | '0'..='9' | 'A'..='Z' | 'a'..='z')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_matches_crypt_order() {
        assert_eq!(ALPHABET.len(), 64);
        assert!(ALPHABET.chars().all(is_alphabet));
        assert!(!is_alphabet('+'));
        assert!(!is_alphabet('$'));
        assert!(!is_alphabet('='));
    }

    #[test]
    fn encode_known_values() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(&[0u8]), "..");
        assert_eq!(encode(b"hello"), "O4JgP4");
        assert_eq!(encode(&(0u8..16).collect::<Vec<_>>()), "..20.kE3/UQ60Ec91.oC1k");
        assert_eq!(encode(&[0xffu8; 16]), "zzzzzzzzzzzzzzzzzzzzzk");
    }

    #[test]
    fn salt_sized_input_yields_22_chars() {
        let encoded = encode(&[0xa5u8; 16]);
        assert_eq!(encoded.len(), 22);
        assert!(encoded.chars().all(is_alphabet));
    }

    #[test]
    fn encoded_len_matches_encode() {
        for len in 0..70 {
            let data = vec![0x5au8; len];
            assert_eq!(encode(&data).len(), encoded_len(len), "len {len}");
        }
    }

    #[test]
    fn digest_sized_input_drops_a_real_character() {
        // 32 bytes encode to 43 characters plus one pad; two are removed
        assert_eq!(encode(&[7u8; 32]).len(), 42);
        assert_eq!(encode(&[7u8; 64]).len(), 86);
    }
}
