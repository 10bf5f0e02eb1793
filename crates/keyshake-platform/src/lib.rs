//! Hardware-isolated key storage for the keyshake handshake.
//!
//! Implements:
//! - iOS: Secure Enclave P-256 key agreement keys
//! - Other targets: `NoHardwareKeyStore`, always unavailable
//! - Testing: `MockKeyStore` with scripted outcomes

// iOS platform code requires unsafe for FFI to Security.framework
#![cfg_attr(not(target_os = "ios"), forbid(unsafe_code))]
#![warn(missing_docs)]

pub mod error;
pub mod mock;
pub mod traits;
pub mod unsupported;

#[cfg(target_os = "ios")]
pub mod ios;

pub use error::{Error, Result};
pub use traits::{HardwareAgreementKey, HardwareKeyStore};
pub use unsupported::NoHardwareKeyStore;

/// Returns the hardware key store for the current build target.
pub fn default_key_store() -> Box<dyn HardwareKeyStore> {
    #[cfg(target_os = "ios")]
    {
        Box::new(ios::SecureEnclaveKeyStore::new())
    }
    #[cfg(not(target_os = "ios"))]
    {
        Box::new(NoHardwareKeyStore)
    }
}
