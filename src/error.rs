use thiserror::Error;

/// Result type alias for hashing operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The native bcrypt primitive rejected its input
    #[error("native hash failed: {0}")]
    Native(#[from] bcrypt::BcryptError),

    #[error("invalid HMAC key: {0}")]
    Mac(#[from] hmac::digest::InvalidLength),

    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Why a string could not be read as a `$F$` salt or hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The input carries no `$F$` tag; it may belong to another scheme.
    #[error("not a fallback-format hash")]
    NotFallback,

    /// The `$F$` tag is present but the rest does not follow the grammar.
    #[error("malformed fallback hash: {0}")]
    Malformed(&'static str),
}
