//! Random bytes and keys.
//!
//! Secure sources are tried first: the OS generator, then `/dev/urandom`. If
//! both fail or return short, the remainder comes from a non-cryptographic
//! generator. Callers always get the requested length; [`RandomBytes::entropy`]
//! tells them which kind they got.

use std::fs::File;
use std::io::Read;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rand::{RngCore, SeedableRng, rngs::SmallRng};
use zeroize::Zeroizing;

use crate::encoding;

/// A source of random bytes that may be unavailable.
pub trait RandomDevice: Send + Sync {
    /// Reads up to `len` bytes, or `None` if the device cannot be used.
    fn try_read(&self, len: usize) -> Option<Vec<u8>>;
}

/// The operating system generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomDevice for OsRandom {
    fn try_read(&self, len: usize) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; len];
        getrandom::fill(&mut buf).ok()?;
        Some(buf)
    }
}

/// `/dev/urandom`, opened and closed on every read.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevUrandom;

impl DevUrandom {
    const PATH: &'static str = "/dev/urandom";
}

impl RandomDevice for DevUrandom {
    fn try_read(&self, len: usize) -> Option<Vec<u8>> {
        let file = File::open(Self::PATH).ok()?;
        let mut buf = Vec::with_capacity(len);
        file.take(len as u64).read_to_end(&mut buf).ok()?;
        Some(buf)
    }
}

/// How random bytes were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entropy {
    /// Entirely from a secure device.
    Secure,
    /// At least partly from the non-cryptographic generator.
    BestEffort,
}

/// Fresh random bytes of an exact length, wiped on drop.
pub struct RandomBytes {
    bytes: Zeroizing<Vec<u8>>,
    entropy: Entropy,
}

impl RandomBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    pub fn is_secure(&self) -> bool {
        self.entropy == Entropy::Secure
    }

    /// Lowercase hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&*self.bytes)
    }
}

/// Returns `len` random bytes from the best available source.
pub fn random_bytes(len: usize) -> RandomBytes {
    let mut bytes = OsRandom.try_read(len).unwrap_or_default();
    bytes.truncate(len);

    if bytes.len() < len {
        bytes = DevUrandom.try_read(len).unwrap_or_default();
        bytes.truncate(len);
    }

    top_up(bytes, len)
}

/// Returns `len` random bytes from `device`, topped up if it comes back short.
pub fn random_bytes_from(device: &dyn RandomDevice, len: usize) -> RandomBytes {
    let mut bytes = device.try_read(len).unwrap_or_default();
    bytes.truncate(len);
    top_up(bytes, len)
}

/// `len` random bytes as `2 * len` lowercase hex characters.
pub fn random_hex(len: usize) -> String {
    random_bytes(len).to_hex()
}

/// A random string of exactly `len` characters from the `./0-9A-Za-z` alphabet.
pub fn random_key(len: usize) -> String {
    let mut raw_len = (len as f64 / 1.33).ceil() as usize;
    while encoding::encoded_len(raw_len) < len {
        raw_len += 1;
    }

    let mut key = encoding::encode(random_bytes(raw_len).as_bytes());
    key.truncate(len);
    key
}

fn top_up(bytes: Vec<u8>, len: usize) -> RandomBytes {
    let mut bytes = Zeroizing::new(bytes);
    if bytes.len() >= len {
        return RandomBytes {
            bytes,
            entropy: Entropy::Secure,
        };
    }

    warn!(
        "secure random source unavailable, filling {} of {len} bytes from a non-cryptographic generator",
        len - bytes.len()
    );

    let mut rng = SmallRng::seed_from_u64(weak_seed());
    while bytes.len() < len {
        bytes.extend_from_slice(&rng.next_u32().to_le_bytes());
    }
    bytes.truncate(len);

    RandomBytes {
        bytes,
        entropy: Entropy::BestEffort,
    }
}

fn weak_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ (u64::from(process::id()) << 32)
}
