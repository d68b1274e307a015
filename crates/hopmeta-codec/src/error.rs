//! Error types for codec configuration.

use thiserror::Error;

/// Errors raised while building or loading a codec configuration.
///
/// Encoding and decoding themselves never fail: entries that cannot be
/// represented are skipped.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A tag or header prefix is empty.
    #[error("tag for {field} is empty")]
    EmptyTag { field: &'static str },

    /// One tag is a prefix of another, so decoding would be ambiguous.
    #[error("tags {first:?} and {second:?} overlap")]
    AmbiguousTags { first: String, second: String },

    /// An HTTP prefix is not a lowercase, valid header name fragment.
    #[error("invalid HTTP header prefix {prefix:?}")]
    InvalidHeaderPrefix { prefix: String },

    /// The TOML source could not be parsed.
    #[error("invalid codec config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias for codec configuration.
pub type CodecResult<T> = Result<T, CodecError>;
