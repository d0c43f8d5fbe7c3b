//! Multi-block dialect.
//!
//! ```text
//! $F$ | COST (2) | $ | BLOCKS (1) | $ | SALT (22) | REST
//! ```
//! The derived key is `BLOCKS * 32` bytes long.

use super::{Dialect, SaltRecord, TAG, split_salt};
use crate::error::FormatError;

/// Returns `true` if `body` opens with a block count segment.
pub(super) fn detect(body: &str) -> bool {
    let bytes = body.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_digit() && bytes[1] == b'$'
}

/// Parses the part of a blocks-dialect string that follows the cost segment.
pub(super) fn parse(cost: u32, body: &str) -> Result<SaltRecord, FormatError> {
    let blocks = body.as_bytes()[0] - b'0';
    if blocks == 0 {
        return Err(FormatError::Malformed("block count must be >= 1"));
    }

    let (salt, rest) = split_salt(&body[2..])?;

    Ok(SaltRecord {
        dialect: Dialect::Blocks(blocks),
        cost,
        salt: salt.to_owned(),
        rest: rest.to_owned(),
    })
}

pub(super) fn render(cost: u32, blocks: u8, salt: &str, rest: &str) -> String {
    format!("{TAG}{cost:02}${blocks}${salt}{rest}")
}
