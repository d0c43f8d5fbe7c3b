//! Legacy single-block dialect.
//!
//! ```text
//! $F$ | COST+4 (2) | $ | SALT (22) | REST
//! ```
//! The stored field is the effective exponent, four above the work factor.

use super::{Dialect, SaltRecord, TAG, split_salt};
use crate::error::FormatError;

/// Offset between the stored cost field and the work factor.
pub const COST_OFFSET: u32 = 4;

/// Parses the part of a legacy string that follows the cost segment.
pub(super) fn parse(field: u32, body: &str) -> Result<SaltRecord, FormatError> {
    let cost = field
        .checked_sub(COST_OFFSET)
        .ok_or(FormatError::Malformed("legacy cost field below 04"))?;

    let (salt, rest) = split_salt(body)?;

    Ok(SaltRecord {
        dialect: Dialect::Legacy,
        cost,
        salt: salt.to_owned(),
        rest: rest.to_owned(),
    })
}

pub(super) fn render(cost: u32, salt: &str, rest: &str) -> String {
    let field = cost + COST_OFFSET;
    format!("{TAG}{field:02}${salt}{rest}")
}
