//! Textual format of fallback salts and hashes.
//!
//! Two dialects share the `$F$` tag:
//! ```text
//! blocks: $F$ | COST (2) | $ | BLOCKS (1) | $ | SALT (22) | REST
//! legacy: $F$ | COST+4 (2) | $ | SALT (22) | REST
//! ```
//! The dialect is recognised from the shape after the cost segment: a lone digit
//! followed by `$` can only be a block count, since salts never contain `$`.

use std::fmt;

use serde::Serialize;

use crate::{crypto::SALT_CHARS, encoding::is_alphabet, error::FormatError};

pub mod blocks;
pub mod legacy;

/// Tag identifying the fallback scheme.
pub const TAG: &str = "$F$";
/// Width of the cost segment.
pub const COST_DIGITS: usize = 2;
/// Largest block count the one-digit segment can hold.
pub const MAX_BLOCKS: u8 = 9;

/// Which `$F$` dialect a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Single-block repeated SHA-256, cost stored with a +4 offset.
    Legacy,
    /// HMAC-SHA256 derivation producing this many 32-byte blocks.
    Blocks(u8),
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Blocks(1)
    }
}

/// A parsed `$F$` salt or hash.
///
/// `rest` holds whatever follows the salt body: the encoded derived key for a
/// full hash, nothing for a bare salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaltRecord {
    dialect: Dialect,
    cost: u32,
    salt: String,
    rest: String,
}

impl SaltRecord {
    /// Builds a bare salt record.
    ///
    /// # Errors
    ///
    /// Returns an error if the salt is not 22 alphabet characters, the block
    /// count is outside `1..=9`, or the cost does not fit the two-digit field.
    pub fn new(dialect: Dialect, cost: u32, salt: impl Into<String>) -> Result<Self, FormatError> {
        let salt = salt.into();
        if salt.len() != SALT_CHARS || !salt.chars().all(is_alphabet) {
            return Err(FormatError::Malformed("salt must be 22 alphabet characters"));
        }

        let field = match dialect {
            Dialect::Blocks(0) => return Err(FormatError::Malformed("block count must be >= 1")),
            Dialect::Blocks(n) if n > MAX_BLOCKS => {
                return Err(FormatError::Malformed("block count must be a single digit"));
            }
            Dialect::Blocks(_) => Some(cost),
            Dialect::Legacy => cost.checked_add(legacy::COST_OFFSET),
        };
        if !field.is_some_and(|f| f < 100) {
            return Err(FormatError::Malformed("cost does not fit two digits"));
        }

        Ok(Self {
            dialect,
            cost,
            salt,
            rest: String::new(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Work factor, without the legacy offset.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// Returns the record with `rest` replaced.
    pub fn with_rest(mut self, rest: impl Into<String>) -> Self {
        self.rest = rest.into();
        self
    }

    /// Renders the record back to its tagged string.
    pub fn render(&self) -> String {
        match self.dialect {
            Dialect::Blocks(n) => blocks::render(self.cost, n, &self.salt, &self.rest),
            Dialect::Legacy => legacy::render(self.cost, &self.salt, &self.rest),
        }
    }
}

impl fmt::Display for SaltRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// The scheme a stored hash belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashKind {
    /// No `$F$` tag: left to the native primitive.
    Native,
    Fallback(SaltRecord),
}

/// Parses a `$F$` salt or hash.
///
/// # Errors
///
/// Returns [`FormatError::NotFallback`] if the tag is missing and
/// [`FormatError::Malformed`] if the tag is present but the grammar is not met.
pub fn parse(input: &str) -> Result<SaltRecord, FormatError> {
    let body = input.strip_prefix(TAG).ok_or(FormatError::NotFallback)?;
    let (field, body) = split_cost(body)?;

    if blocks::detect(body) {
        blocks::parse(field, body)
    } else {
        legacy::parse(field, body)
    }
}

/// Decides which scheme produced `stored`.
///
/// # Errors
///
/// Returns [`FormatError::Malformed`] for `$F$` strings that do not parse.
pub fn identify(stored: &str) -> Result<HashKind, FormatError> {
    match parse(stored) {
        Ok(record) => Ok(HashKind::Fallback(record)),
        Err(FormatError::NotFallback) => Ok(HashKind::Native),
        Err(e) => Err(e),
    }
}

/// Splits the two-digit cost field and its `$` separator off `body`.
fn split_cost(body: &str) -> Result<(u32, &str), FormatError> {
    let bytes = body.as_bytes();
    if bytes.len() <= COST_DIGITS || !bytes[..COST_DIGITS].iter().all(u8::is_ascii_digit) {
        return Err(FormatError::Malformed("cost must be two digits"));
    }
    if bytes[COST_DIGITS] != b'$' {
        return Err(FormatError::Malformed("missing '$' after cost"));
    }

    let field = bytes[..COST_DIGITS]
        .iter()
        .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'));

    Ok((field, &body[COST_DIGITS + 1..]))
}

/// Splits the 22-character salt body off `body`.
fn split_salt(body: &str) -> Result<(&str, &str), FormatError> {
    let bytes = body.as_bytes();
    if bytes.len() < SALT_CHARS || !bytes[..SALT_CHARS].iter().all(|b| is_alphabet(char::from(*b))) {
        return Err(FormatError::Malformed("salt must be 22 alphabet characters"));
    }

    Ok(body.split_at(SALT_CHARS))
}
