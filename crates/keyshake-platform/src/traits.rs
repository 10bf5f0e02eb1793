//! Platform abstraction traits for hardware-isolated P-256 agreement keys.
//!
//! These traits let the session layer prefer hardware keys without knowing
//! which secure element backs them, and keep the selection logic testable
//! through mocks.

use crate::error::Result;
use p256::PublicKey;

/// A secure element able to create P-256 key agreement keys.
///
/// Platform-specific implementations:
/// - iOS: Secure Enclave via Security.framework (`SecureEnclaveKeyStore`)
/// - Everything else: no hardware (`NoHardwareKeyStore`)
/// - Testing: scripted behavior (`MockKeyStore`)
pub trait HardwareKeyStore: Send + Sync {
    /// Returns `true` if hardware key creation may be attempted.
    ///
    /// Must be `false` when the hardware is absent or the process runs in a
    /// simulator or emulator without real hardware backing.
    fn is_available(&self) -> bool;

    /// Creates a fresh, non-persistent P-256 key agreement key.
    ///
    /// `label` is used only for diagnostics.
    ///
    /// # Errors
    ///
    /// - `Error::Unavailable` if the hardware turned out to be unusable
    /// - `Error::Keystore` if the hardware attempted and failed key creation
    fn generate_agreement_key(&self, label: &str) -> Result<Box<dyn HardwareAgreementKey>>;
}

/// A P-256 private key held inside a secure element.
///
/// The private scalar is never exposed to the process; only the public
/// point and agreement results leave the hardware.
pub trait HardwareAgreementKey: Send {
    /// Returns the public point of this key.
    ///
    /// # Errors
    ///
    /// - `Error::Keystore` if the hardware cannot export the public key
    fn public_key(&self) -> Result<PublicKey>;

    /// Performs ECDH with `peer` and writes the 32-byte x-coordinate to `out`.
    ///
    /// Implementations must not retain any copy of the shared secret after
    /// returning.
    ///
    /// # Errors
    ///
    /// - `Error::Keystore` if the hardware rejects the operation
    fn agree(&self, peer: &PublicKey, out: &mut [u8; 32]) -> Result<()>;
}
