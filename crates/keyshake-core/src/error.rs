//! Error types for handshake sessions.

use keyshake_crypto::{AgreementError, DecodeError};
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Session errors.
///
/// Callers branch on the variant or on [`Error::kind`], never on the message.
#[derive(Debug, Error)]
pub enum Error {
    /// Local key pair creation failed after hardware creation was attempted.
    #[error("Key pair initialization failed: {0}")]
    Initialization(String),

    /// Remote public key string was rejected.
    #[error("Remote public key rejected: {0}")]
    Decode(#[from] DecodeError),

    /// Shared secret derivation failed.
    #[error("Key agreement failed: {0}")]
    Agreement(#[from] AgreementError),
}

impl Error {
    /// Stable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Initialization(_) => ErrorKind::Initialization,
            Error::Decode(DecodeError::MalformedEncoding) => ErrorKind::MalformedEncoding,
            Error::Decode(DecodeError::InvalidKey) => ErrorKind::InvalidKey,
            Error::Agreement(AgreementError::ComputationFailed) => ErrorKind::ComputationFailed,
            Error::Agreement(AgreementError::RemoteKeyNotSet) => ErrorKind::RemoteKeyNotSet,
        }
    }
}

impl From<keyshake_crypto::Error> for Error {
    fn from(err: keyshake_crypto::Error) -> Self {
        match err {
            keyshake_crypto::Error::Decode(kind) => Error::Decode(kind),
            keyshake_crypto::Error::Agreement(kind) => Error::Agreement(kind),
            other => Error::Initialization(other.to_string()),
        }
    }
}

/// Caller-facing error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local key pair could not be created.
    Initialization,
    /// Remote key is not valid base64.
    MalformedEncoding,
    /// Remote key is not a valid P-256 point.
    InvalidKey,
    /// ECDH computation failed.
    ComputationFailed,
    /// Derivation requested before a remote key was set.
    RemoteKeyNotSet,
}

impl ErrorKind {
    /// Stable label, suitable for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::MalformedEncoding => "malformed_encoding",
            Self::InvalidKey => "invalid_key",
            Self::ComputationFailed => "computation_failed",
            Self::RemoteKeyNotSet => "remote_key_not_set",
        }
    }

    /// Returns `true` if the error was caused by the remote peer's input
    /// rather than the local environment.
    pub fn is_remote_input(self) -> bool {
        matches!(self, Self::MalformedEncoding | Self::InvalidKey)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
