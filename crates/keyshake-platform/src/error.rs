//! Hardware key store errors.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Platform errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Hardware key store not available on this device or build target.
    #[error("Hardware key store not available: {0}")]
    Unavailable(String),

    /// Hardware key store refused or failed an operation.
    #[error("Keystore error: {0}")]
    Keystore(String),
}
