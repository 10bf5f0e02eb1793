//! Error types for key agreement operations.

use thiserror::Error;

/// Result type alias for key agreement operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Reasons a remote public key string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input is not valid base64.
    #[error("Public key is not valid base64")]
    MalformedEncoding,

    /// Decoded bytes are not a DER-encoded P-256 public key on the curve.
    #[error("Public key is not a valid P-256 point")]
    InvalidKey,
}

/// Reasons a shared secret could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AgreementError {
    /// The ECDH primitive failed for the given key pair and remote key.
    #[error("Shared secret computation failed")]
    ComputationFailed,

    /// Derivation was requested before a remote public key was supplied.
    #[error("Remote public key has not been set")]
    RemoteKeyNotSet,
}

/// Key agreement errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Remote public key decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Shared secret derivation failed.
    #[error(transparent)]
    Agreement(#[from] AgreementError),

    /// Invalid private key.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Local public key could not be serialized.
    #[error("Public key encoding failed: {0}")]
    Encoding(String),
}
