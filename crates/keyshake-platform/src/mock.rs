//! Mock key store for testing.
//!
//! Scripts every outcome the session layer must handle: no hardware,
//! working hardware, hardware that fails key creation, and hardware that
//! fails agreement. "Hardware" keys are simulated with in-process P-256
//! scalars that are never exposed through the trait.

use crate::error::{Error, Result};
use crate::traits::{HardwareAgreementKey, HardwareKeyStore};
use p256::ecdh::diffie_hellman;
use p256::{PublicKey, SecretKey};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Scripted behavior of a [`MockKeyStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// `is_available()` returns `false`.
    Unavailable,
    /// Available, key creation and agreement succeed.
    Working,
    /// Available, but key creation reports `Error::Unavailable`.
    VanishesOnGenerate,
    /// Available, but key creation fails with `Error::Keystore`.
    FailsOnGenerate,
    /// Available, key creation succeeds, agreement fails.
    FailsOnAgree,
}

/// Mock hardware key store.
///
/// # Example
///
/// ```
/// use keyshake_platform::mock::{MockBehavior, MockKeyStore};
/// use keyshake_platform::traits::HardwareKeyStore;
///
/// let store = MockKeyStore::new(MockBehavior::Working);
/// assert!(store.is_available());
///
/// let key = store.generate_agreement_key("client").unwrap();
/// assert!(key.public_key().is_ok());
/// assert_eq!(store.generate_attempts(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockKeyStore {
    behavior: MockBehavior,
    attempts: Arc<AtomicUsize>,
}

impl MockKeyStore {
    /// Creates a mock store with the given behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `generate_agreement_key` has been called.
    ///
    /// Clones share the counter, so a clone kept by a test observes calls
    /// made through a boxed copy.
    pub fn generate_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl HardwareKeyStore for MockKeyStore {
    fn is_available(&self) -> bool {
        self.behavior != MockBehavior::Unavailable
    }

    fn generate_agreement_key(&self, label: &str) -> Result<Box<dyn HardwareAgreementKey>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Unavailable | MockBehavior::VanishesOnGenerate => Err(
                Error::Unavailable(format!("mock hardware unavailable for {}", label)),
            ),
            MockBehavior::FailsOnGenerate => Err(Error::Keystore(format!(
                "mock key creation failed for {}",
                label
            ))),
            MockBehavior::Working => Ok(Box::new(MockAgreementKey::generate(false))),
            MockBehavior::FailsOnAgree => Ok(Box::new(MockAgreementKey::generate(true))),
        }
    }
}

/// Simulated hardware key.
struct MockAgreementKey {
    secret_key: SecretKey,
    fail_agree: bool,
}

impl MockAgreementKey {
    fn generate(fail_agree: bool) -> Self {
        Self {
            secret_key: SecretKey::random(&mut rand::rngs::OsRng),
            fail_agree,
        }
    }
}

impl HardwareAgreementKey for MockAgreementKey {
    fn public_key(&self) -> Result<PublicKey> {
        Ok(self.secret_key.public_key())
    }

    fn agree(&self, peer: &PublicKey, out: &mut [u8; 32]) -> Result<()> {
        if self.fail_agree {
            return Err(Error::Keystore("mock agreement rejected".into()));
        }

        let shared = diffie_hellman(self.secret_key.to_nonzero_scalar(), peer.as_affine());
        out.copy_from_slice(shared.raw_secret_bytes().as_slice());
        Ok(())
    }
}
