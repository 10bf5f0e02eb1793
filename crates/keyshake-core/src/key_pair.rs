//! Local key pair handle: hardware-isolated or software.

use keyshake_crypto::keypair::SoftwareKeyPair;
use keyshake_crypto::secret::SHARED_SECRET_LEN;
use keyshake_crypto::{AgreementError, PublicKey, RemotePublicKey};
use keyshake_platform::HardwareAgreementKey;

/// Where the private half of a session key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBacking {
    /// Private key held by a secure element, never exported.
    Hardware,
    /// Private key held in process memory, zeroed on drop.
    Software,
}

/// Local P-256 key pair.
///
/// Both variants expose the same two operations, so no call site needs to
/// know which one it holds.
pub enum KeyPairHandle {
    /// Secure element key.
    Hardware(Box<dyn HardwareAgreementKey>),
    /// In-memory key.
    Software(SoftwareKeyPair),
}

impl KeyPairHandle {
    /// The backing of this key pair.
    pub fn backing(&self) -> KeyBacking {
        match self {
            KeyPairHandle::Hardware(_) => KeyBacking::Hardware,
            KeyPairHandle::Software(_) => KeyBacking::Software,
        }
    }

    /// The local public key.
    pub fn public_key(&self) -> Result<PublicKey, keyshake_platform::Error> {
        match self {
            KeyPairHandle::Hardware(key) => key.public_key(),
            KeyPairHandle::Software(pair) => Ok(pair.public_key().clone()),
        }
    }

    /// Run ECDH against `remote`, writing the raw shared secret into `out`.
    pub fn agree(
        &self,
        remote: &RemotePublicKey,
        out: &mut [u8; SHARED_SECRET_LEN],
    ) -> keyshake_crypto::Result<()> {
        match self {
            KeyPairHandle::Hardware(key) => {
                key.agree(remote.as_public_key(), out).map_err(|e| {
                    tracing::debug!("Hardware key agreement failed: {}", e);
                    AgreementError::ComputationFailed.into()
                })
            }
            KeyPairHandle::Software(pair) => pair.agree(remote.as_public_key(), out),
        }
    }
}

impl core::fmt::Debug for KeyPairHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyPairHandle::Hardware(_) => f.write_str("KeyPairHandle::Hardware"),
            KeyPairHandle::Software(pair) => {
                f.debug_tuple("KeyPairHandle::Software").field(pair).finish()
            }
        }
    }
}
