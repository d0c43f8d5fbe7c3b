use hmac::{Hmac, Mac};
use log::debug;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{BLOCK_LEN, DEFAULT_COST, clamp_cost};
use crate::{
    encoding,
    error::{Error, Result},
    format::{Dialect, MAX_BLOCKS, SaltRecord},
};

type HmacSha256 = Hmac<Sha256>;

/// Extra exponent for the HMAC dialect; one round is cheaper than a bcrypt round.
const BLOCKS_BOOST: u32 = 3;
/// Extra exponent for the legacy dialect.
const LEGACY_BOOST: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    cost: u32,
    dialect: Dialect,
    prefer_native: bool,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            // 2^8 bcrypt rounds, 2^11 HMAC rounds
            cost: DEFAULT_COST,
            dialect: Dialect::default(),
            prefer_native: true,
        }
    }
}

impl HashParams {
    /// Cost is clamped into range; the dialect is validated.
    pub fn new(cost: u32, dialect: Dialect) -> Result<Self> {
        let params = Self {
            cost: clamp_cost(cost),
            dialect,
            prefer_native: true,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn prefer_native(&self) -> bool {
        self.prefer_native
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = clamp_cost(cost);
        self
    }

    /// Setting `false` makes new hashes use the fallback dialect even when
    /// bcrypt is available.
    pub fn with_prefer_native(mut self, prefer_native: bool) -> Self {
        self.prefer_native = prefer_native;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Dialect::Blocks(n) = self.dialect {
            if n == 0 || n > MAX_BLOCKS {
                return Err(Error::InvalidParams(format!(
                    "block count must be between 1 and {MAX_BLOCKS}, got {n}"
                )));
            }
        }
        Ok(())
    }
}

/// Recomputes the fallback hash for `record`'s salt and cost.
///
/// Any `rest` on the input is ignored; the result carries the freshly derived
/// output. The cost is clamped before use, and the rendered string carries the
/// clamped value.
pub fn derive(password: &[u8], record: &SaltRecord) -> Result<SaltRecord> {
    let cost = clamp_cost(record.cost());
    let bare = SaltRecord::new(record.dialect(), cost, record.salt())?;

    let output = match record.dialect() {
        Dialect::Blocks(blocks) => hmac_blocks(password, record.salt().as_bytes(), cost, blocks)?,
        Dialect::Legacy => iterated_digest(password, record.salt().as_bytes(), cost),
    };

    Ok(bare.with_rest(encoding::encode(&output)))
}

/// HMAC-SHA256 block derivation.
///
/// Each block starts from `U0 = HMAC(password, salt || be32(index))` and XORs in
/// `2^(cost + 3)` further chained MAC outputs, so the accumulator covers U0
/// through Un.
fn hmac_blocks(password: &[u8], salt: &[u8], cost: u32, blocks: u8) -> Result<Zeroizing<Vec<u8>>> {
    let repetitions = 1u64 << (cost + BLOCKS_BOOST);
    debug!("deriving {blocks} HMAC block(s) with {repetitions} repetitions");

    let prf = HmacSha256::new_from_slice(password)?;
    let mut output = Zeroizing::new(Vec::with_capacity(usize::from(blocks) * BLOCK_LEN));

    for index in 0..u32::from(blocks) {
        let mut mac = prf.clone();
        mac.update(salt);
        mac.update(&index.to_be_bytes());

        let mut u = Zeroizing::new([0u8; BLOCK_LEN]);
        u.copy_from_slice(&mac.finalize().into_bytes());
        let mut acc = u.clone();

        for _ in 0..repetitions {
            let mut mac = prf.clone();
            mac.update(&*u);
            u.copy_from_slice(&mac.finalize().into_bytes());

            acc.iter_mut().zip(u.iter()).for_each(|(a, b)| *a ^= b);
        }

        output.extend_from_slice(&*acc);
    }

    Ok(output)
}

/// Legacy derivation: `state = SHA256(salt || state)` starting from the password,
/// `2^(cost + 4)` times.
fn iterated_digest(password: &[u8], salt: &[u8], cost: u32) -> Zeroizing<Vec<u8>> {
    let repetitions = 1u64 << (cost + LEGACY_BOOST);
    debug!("deriving legacy digest with {repetitions} repetitions");

    let mut state = Zeroizing::new(password.to_vec());
    for _ in 0..repetitions {
        let digest = Sha256::new().chain_update(salt).chain_update(&*state).finalize();
        state.clear();
        state.extend_from_slice(&digest);
    }

    state
}
