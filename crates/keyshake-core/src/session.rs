//! Handshake session.
//!
//! A session owns one local key pair for its whole life. The caller sends
//! [`Session::local_public_key`] to the peer, feeds the peer's key back in,
//! and receives 32 bytes of entropy. After that the session is normally
//! dropped, which wipes its scratch buffers and software private key.

use crate::error::Result;
use crate::key_pair::{KeyBacking, KeyPairHandle};
use crate::provider::KeyPairProvider;
use keyshake_crypto::entropy::{self, Entropy, ENTROPY_LEN};
use keyshake_crypto::{codec, AgreementError, DerivationScratch, RemotePublicKey};
use zeroize::Zeroize;

/// Whether sessions may use hardware-isolated keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwarePolicy {
    /// Use the hardware key store when it is available.
    Prefer,
    /// Always generate software keys.
    SoftwareOnly,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hardware key preference.
    pub hardware_policy: HardwarePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hardware_policy: HardwarePolicy::Prefer,
        }
    }
}

/// One side of an ECDH handshake.
pub struct Session {
    /// Diagnostic label only.
    label: String,
    key_pair: KeyPairHandle,
    /// base64(DER SPKI) of the local public key, computed once.
    local_public_key: String,
    /// Held until the next derivation consumes it.
    remote_public_key: Option<RemotePublicKey>,
    scratch: DerivationScratch,
}

impl Session {
    /// Create a session with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Initialization` if a hardware key was attempted and
    /// could not be created.
    pub fn new(label: &str) -> Result<Self> {
        Self::with_config(label, SessionConfig::default())
    }

    /// Create a session using the build target's key store and `config`.
    pub fn with_config(label: &str, config: SessionConfig) -> Result<Self> {
        Self::with_provider(label, &KeyPairProvider::from_config(&config))
    }

    /// Create a session whose key pair comes from `provider`.
    pub fn with_provider(label: &str, provider: &KeyPairProvider) -> Result<Self> {
        let key_pair = provider.initialize(label)?;

        let public_key = key_pair
            .public_key()
            .map_err(|e| crate::Error::Initialization(e.to_string()))?;
        let local_public_key = codec::encode_public_key(&public_key)?;

        let backing = key_pair.backing();
        tracing::info!("Handshake session created for {} ({:?} key)", label, backing);

        Ok(Self {
            label: label.to_string(),
            key_pair,
            local_public_key,
            remote_public_key: None,
            scratch: DerivationScratch::new(),
        })
    }

    /// The diagnostic label given at creation.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Where the local private key lives.
    pub fn backing(&self) -> KeyBacking {
        self.key_pair.backing()
    }

    /// Returns `true` if the private key is held by a secure element.
    pub fn is_hardware_backed(&self) -> bool {
        self.backing() == KeyBacking::Hardware
    }

    /// Local public key as base64(DER SubjectPublicKeyInfo).
    pub fn local_public_key(&self) -> &str {
        &self.local_public_key
    }

    /// Decode and store the peer's public key for the next derivation.
    ///
    /// Any previously stored key is discarded first, so a rejected key never
    /// leaves an older one in place.
    ///
    /// # Errors
    ///
    /// - `Error::Decode(DecodeError::MalformedEncoding)` for non-base64 input
    /// - `Error::Decode(DecodeError::InvalidKey)` for anything that is not a
    ///   P-256 point
    pub fn set_remote_public_key(&mut self, encoded: &str) -> Result<()> {
        self.remote_public_key = None;
        let remote = codec::decode_public_key(encoded).map_err(|e| {
            tracing::debug!("Remote public key rejected for {}: {}", self.label, e);
            e
        })?;
        self.remote_public_key = Some(remote);
        Ok(())
    }

    /// Derive entropy from the stored remote key.
    ///
    /// The remote key is consumed: a second call without setting a new one
    /// fails.
    ///
    /// # Errors
    ///
    /// - `Error::Agreement(AgreementError::RemoteKeyNotSet)` if no remote key
    ///   is stored
    /// - `Error::Agreement(AgreementError::ComputationFailed)` if ECDH fails
    pub fn derive_entropy(&mut self) -> Result<Entropy> {
        let remote = self
            .remote_public_key
            .take()
            .ok_or(AgreementError::RemoteKeyNotSet)?;

        let key_pair = &self.key_pair;
        let entropy = entropy::derive_entropy(&mut self.scratch, |shared| {
            key_pair.agree(&remote, shared)
        })
        .map_err(|e| {
            tracing::debug!("Entropy derivation failed for {}: {}", self.label, e);
            e
        })?;

        Ok(entropy)
    }

    /// Decode `remote_public_key` and derive entropy from it.
    pub fn compute_shared_entropy(&mut self, remote_public_key: &str) -> Result<Entropy> {
        self.set_remote_public_key(remote_public_key)?;
        self.derive_entropy()
    }

    /// Like [`Session::compute_shared_entropy`], writing into `out`.
    ///
    /// `out` is left zeroed on failure.
    pub fn compute_shared_entropy_into(
        &mut self,
        remote_public_key: &str,
        out: &mut [u8; ENTROPY_LEN],
    ) -> Result<()> {
        match self.compute_shared_entropy(remote_public_key) {
            Ok(entropy) => {
                out.copy_from_slice(&*entropy);
                Ok(())
            }
            Err(e) => {
                out.zeroize();
                Err(e)
            }
        }
    }

    /// Inspection hook: `true` if no shared-secret or digest bytes remain in
    /// the session's scratch buffers.
    pub fn scratch_is_wiped(&self) -> bool {
        self.scratch.is_wiped()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.scratch.zeroize();
        tracing::debug!("Handshake session destroyed for {}", self.label);
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("label", &self.label)
            .field("backing", &self.backing())
            .field("local_public_key", &self.local_public_key)
            .field("remote_set", &self.remote_public_key.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use keyshake_platform::mock::{MockBehavior, MockKeyStore};

    fn software_session(label: &str) -> Session {
        Session::with_config(
            label,
            SessionConfig {
                hardware_policy: HardwarePolicy::SoftwareOnly,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_default_config_prefers_hardware() {
        assert_eq!(
            SessionConfig::default().hardware_policy,
            HardwarePolicy::Prefer
        );
    }

    #[test]
    fn test_derive_before_remote_key_fails() {
        let mut session = software_session("client");

        let err = session.derive_entropy().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteKeyNotSet);
        assert!(session.scratch_is_wiped());
    }

    #[test]
    fn test_remote_key_consumed_by_derivation() {
        let mut alice = software_session("alice");
        let bob = software_session("bob");

        alice.set_remote_public_key(bob.local_public_key()).unwrap();
        alice.derive_entropy().unwrap();

        let err = alice.derive_entropy().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteKeyNotSet);
    }

    #[test]
    fn test_rejected_remote_key_discards_previous_key() {
        let mut alice = software_session("alice");
        let bob = software_session("bob");

        alice.set_remote_public_key(bob.local_public_key()).unwrap();
        assert!(alice.set_remote_public_key("not-base64!!").is_err());

        let err = alice.derive_entropy().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteKeyNotSet);
    }

    #[test]
    fn test_hardware_session_agrees_with_software_session() {
        let store = MockKeyStore::new(MockBehavior::Working);
        let provider = KeyPairProvider::new(Box::new(store));
        let mut hardware = Session::with_provider("hardware", &provider).unwrap();
        let mut software = software_session("software");

        assert!(hardware.is_hardware_backed());
        assert!(!software.is_hardware_backed());

        let software_key = software.local_public_key().to_string();
        let hardware_key = hardware.local_public_key().to_string();

        let a = hardware.compute_shared_entropy(&software_key).unwrap();
        let b = software.compute_shared_entropy(&hardware_key).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_hardware_agreement_failure_wipes_scratch() {
        let store = MockKeyStore::new(MockBehavior::FailsOnAgree);
        let provider = KeyPairProvider::new(Box::new(store));
        let mut hardware = Session::with_provider("hardware", &provider).unwrap();
        let peer = software_session("peer");

        let err = hardware
            .compute_shared_entropy(peer.local_public_key())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ComputationFailed);
        assert!(hardware.scratch_is_wiped());
    }

    #[test]
    fn test_into_variant_zeroes_output_on_failure() {
        let mut session = software_session("client");
        let mut out = [0xFFu8; ENTROPY_LEN];

        let err = session
            .compute_shared_entropy_into("not-base64!!", &mut out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        assert_eq!(out, [0u8; ENTROPY_LEN]);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let session = software_session("client");
        let rendered = format!("{:?}", session);

        assert!(rendered.contains("client"));
        assert!(rendered.contains("Software"));
        assert!(!rendered.contains("secret"));
    }
}
