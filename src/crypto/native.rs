use base64::{
    Engine,
    alphabet::BCRYPT,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use bcrypt::Version;
use log::debug;

use super::SALT_LEN;
use crate::error::{Error, Result};

/// A strong password-hashing primitive with its own modular crypt format.
///
/// Its output is opaque to this crate beyond not carrying the `$F$` tag.
pub trait NativeHasher: Send + Sync {
    /// Whether the primitive can be used on this platform.
    fn available(&self) -> bool;

    /// Hashes `password` with the given cost and 22-character encoded salt.
    fn hash(&self, password: &[u8], cost: u32, salt: &str) -> Result<String>;

    /// Checks `password` against a hash this primitive produced.
    fn verify(&self, password: &[u8], stored: &str) -> bool;
}

/// bcrypt, producing `$2a$` hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bcrypt;

// Salts arrive in the `./0-9A-Za-z` alphabet; crypt(3) reads the same 22
// characters in bcrypt order and ignores the four spare bits.
const SALT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

impl NativeHasher for Bcrypt {
    fn available(&self) -> bool {
        true
    }

    fn hash(&self, password: &[u8], cost: u32, salt: &str) -> Result<String> {
        let raw = SALT_ENGINE
            .decode(salt)
            .map_err(|e| Error::InvalidParams(format!("bcrypt salt: {e}")))?;
        let raw: [u8; SALT_LEN] = raw
            .try_into()
            .map_err(|_| Error::InvalidParams("bcrypt salt must decode to 16 bytes".into()))?;

        let parts = bcrypt::hash_with_salt(password, cost, raw)?;
        Ok(parts.format_for_version(Version::TwoA))
    }

    fn verify(&self, password: &[u8], stored: &str) -> bool {
        bcrypt::verify(password, stored).unwrap_or_else(|e| {
            debug!("bcrypt rejected stored hash: {e}");
            false
        })
    }
}
