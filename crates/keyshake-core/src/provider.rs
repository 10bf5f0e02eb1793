//! Local key pair selection.
//!
//! Hardware-isolated keys are preferred. The fallback rules are:
//!
//! | Store state                              | Result                  |
//! |------------------------------------------|-------------------------|
//! | not available, or policy `SoftwareOnly`  | software key pair       |
//! | available, creation fails for any reason | `Error::Initialization` |
//! | available, creation succeeds             | hardware key pair       |
//!
//! Once creation has been attempted there is no silent fallback, even if the
//! store reports that the hardware disappeared after the availability check.

use crate::error::{Error, Result};
use crate::key_pair::KeyPairHandle;
use crate::session::{HardwarePolicy, SessionConfig};
use keyshake_crypto::keypair::SoftwareKeyPair;
use keyshake_platform::{default_key_store, HardwareKeyStore};

/// Creates the local key pair for a session.
pub struct KeyPairProvider {
    store: Box<dyn HardwareKeyStore>,
    policy: HardwarePolicy,
}

impl KeyPairProvider {
    /// Provider backed by `store`, preferring hardware keys.
    pub fn new(store: Box<dyn HardwareKeyStore>) -> Self {
        Self {
            store,
            policy: HardwarePolicy::Prefer,
        }
    }

    /// Provider using the build target's key store and the config's policy.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(default_key_store()).with_policy(config.hardware_policy)
    }

    /// Replace the hardware policy.
    pub fn with_policy(mut self, policy: HardwarePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create a key pair for the session named `label`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Initialization` when hardware key creation was
    /// attempted and failed.
    pub fn initialize(&self, label: &str) -> Result<KeyPairHandle> {
        if self.policy == HardwarePolicy::Prefer && self.store.is_available() {
            return match self.store.generate_agreement_key(label) {
                Ok(key) => Ok(KeyPairHandle::Hardware(key)),
                Err(e) => {
                    tracing::warn!("Unable to create hardware key for {}: {}", label, e);
                    Err(Error::Initialization(e.to_string()))
                }
            };
        }

        tracing::debug!("Using software key pair for {}", label);
        let pair = SoftwareKeyPair::generate()?;
        Ok(KeyPairHandle::Software(pair))
    }
}
