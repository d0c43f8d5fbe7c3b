//! Salted, self-describing password hashes.
//!
//! New hashes use bcrypt (`$2a$`) when it is available and otherwise an
//! iterated HMAC-SHA256 derivation tagged `$F$`. [`validate`] accepts both, as
//! well as the legacy single-block `$F$` dialect.
//!
//! ```
//! let stored = passnest::hash("hello world", 8)?;
//! assert!(passnest::validate("hello world", &stored));
//! assert!(!passnest::validate("goodbye world", &stored));
//! # Ok::<(), passnest::Error>(())
//! ```

pub mod crypto;
pub mod encoding;
mod error;
pub mod format;
pub mod random;

pub use crate::crypto::{Bcrypt, HashParams, NativeHasher};
pub use crate::error::{Error, FormatError, Result};
pub use crate::format::{Dialect, HashKind, SaltRecord};
pub use crate::random::{Entropy, RandomBytes, random_bytes, random_hex, random_key};

use log::debug;
use subtle::ConstantTimeEq;

use crate::crypto::{MAX_COST, MIN_COST, SALT_LEN};

/// Hashes and validates passwords with a fixed configuration.
pub struct Hasher {
    params: HashParams,
    native: Option<Box<dyn NativeHasher>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashParams::default())
    }
}

impl Hasher {
    /// A hasher backed by bcrypt.
    pub fn new(params: HashParams) -> Self {
        Self::with_native(params, Bcrypt)
    }

    /// A hasher with a caller-supplied native primitive.
    pub fn with_native(params: HashParams, native: impl NativeHasher + 'static) -> Self {
        Self {
            params,
            native: Some(Box::new(native)),
        }
    }

    /// A hasher with no native primitive; only `$F$` hashes are produced or accepted.
    pub fn fallback_only(params: HashParams) -> Self {
        Self {
            params,
            native: None,
        }
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    fn native(&self) -> Option<&dyn NativeHasher> {
        self.native.as_deref().filter(|n| n.available())
    }

    /// Hashes `password` with a fresh salt.
    pub fn hash(&self, password: impl AsRef<[u8]>) -> Result<String> {
        let password = password.as_ref();
        let cost = self.params.cost();
        let salt = encoding::encode(random_bytes(SALT_LEN).as_bytes());

        if self.params.prefer_native() {
            if let Some(native) = self.native() {
                debug!("hashing with native primitive, cost {cost}");
                return native.hash(password, cost, &salt);
            }
        }

        debug!("hashing with {:?} fallback, cost {cost}", self.params.dialect());
        let record = SaltRecord::new(self.params.dialect(), cost, salt)?;
        Ok(crypto::derive(password, &record)?.render())
    }

    /// Checks `password` against `stored`. Anything unreadable is a mismatch.
    pub fn validate(&self, password: impl AsRef<[u8]>, stored: &str) -> bool {
        let password = password.as_ref();

        match format::identify(stored) {
            Ok(HashKind::Fallback(record)) => {
                if !(MIN_COST..=MAX_COST).contains(&record.cost()) {
                    debug!("stored cost {} out of range", record.cost());
                    return false;
                }
                match crypto::derive(password, &record) {
                    Ok(derived) => constant_time_eq(&derived.render(), stored),
                    Err(e) => {
                        debug!("fallback derivation failed: {e}");
                        false
                    }
                }
            }
            Ok(HashKind::Native) => match self.native() {
                Some(native) => native.verify(password, stored),
                None => {
                    debug!("no native primitive for non-$F$ hash");
                    false
                }
            },
            Err(e) => {
                debug!("{e}");
                false
            }
        }
    }
}

/// Hashes `password` with bcrypt at `cost` (clamped to 4..=31).
pub fn hash(password: impl AsRef<[u8]>, cost: u32) -> Result<String> {
    Hasher::new(HashParams::default().with_cost(cost)).hash(password)
}

/// Hashes `password` with explicit parameters.
pub fn hash_with(password: impl AsRef<[u8]>, params: &HashParams) -> Result<String> {
    Hasher::new(*params).hash(password)
}

/// Checks `password` against a stored `$F$` or bcrypt hash.
pub fn validate(password: impl AsRef<[u8]>, stored: &str) -> bool {
    Hasher::default().validate(password, stored)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
