//! Decode error type.

use abicodec_buffers::CursorError;
use thiserror::Error;

/// Error raised while decoding a value against an ABI schema.
///
/// Structural and cursor errors propagate unmodified up the recursive
/// descent; the facade wraps them exactly once into
/// [`DecodeError::Decoding`] carrying the rendered coding path. Errors
/// raised before a decoding context exists ([`DecodeError::InvalidJson`],
/// [`DecodeError::NothingToDecode`], [`DecodeError::AbiSynthesisFailed`])
/// surface directly, without path wrapping.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error("unknown variant index {index} for {type_name}")]
    UnknownVariantIndex { type_name: String, index: u8 },
    #[error("unknown variant type {name} for {type_name}")]
    UnknownVariantType { type_name: String, name: String },
    #[error("unknown type {0}")]
    UnknownType(String),
    #[error("invalid type {0}")]
    InvalidType(String),
    #[error("expected array for {0}")]
    ExpectedArray(String),
    #[error("expected object for {0}")]
    ExpectedObject(String),
    #[error("unexpected null for non-optional type {0}")]
    UnexpectedNull(String),
    #[error("maximum decoding depth exceeded")]
    MaxDepthExceeded,
    #[error("unable to synthesize abi for {0}, pass an explicit abi")]
    AbiSynthesisFailed(String),
    #[error("nothing to decode, set exactly one of data, object or json")]
    NothingToDecode,
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid {expected} value")]
    InvalidValue { expected: &'static str },
    #[error("decoding error at {path}: {source}")]
    Decoding {
        path: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Unwraps the path-annotated wrapper, if any, down to the underlying
    /// error.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Decoding { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
