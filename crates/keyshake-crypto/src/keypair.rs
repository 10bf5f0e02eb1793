//! Software P-256 key pair for ECDH key agreement.
//!
//! Used whenever a hardware-isolated key store is unavailable. The private
//! scalar lives in process memory and is zeroed when the key pair is dropped.
//!
//! # Security
//!
//! - `p256::SecretKey` zeroizes its scalar on drop.
//! - The raw ECDH output is written straight into a caller-supplied buffer,
//!   normally a [`crate::secret::SecretBuffer`], and the intermediate
//!   `SharedSecret` zeroizes itself on drop.
//!
//! # Example
//!
//! ```
//! use keyshake_crypto::keypair::SoftwareKeyPair;
//!
//! # fn example() -> Result<(), keyshake_crypto::Error> {
//! let alice = SoftwareKeyPair::generate()?;
//! let bob = SoftwareKeyPair::generate()?;
//!
//! let mut alice_shared = [0u8; 32];
//! let mut bob_shared = [0u8; 32];
//! alice.agree(bob.public_key(), &mut alice_shared)?;
//! bob.agree(alice.public_key(), &mut bob_shared)?;
//!
//! assert_eq!(alice_shared, bob_shared);
//! # Ok(())
//! # }
//! ```

use crate::secret::SHARED_SECRET_LEN;
use crate::{Error, Result};
use p256::ecdh::diffie_hellman;
use p256::{PublicKey, SecretKey};

/// In-memory P-256 key pair.
pub struct SoftwareKeyPair {
    /// Secret scalar, zeroed on drop.
    secret_key: SecretKey,
    /// Public point, cached.
    public_key: PublicKey,
}

impl SoftwareKeyPair {
    /// Generate a new random key pair using the OS RNG.
    ///
    /// # Errors
    ///
    /// Does not fail in practice. Returns a `Result` so that software and
    /// hardware key creation share a signature.
    pub fn generate() -> Result<Self> {
        let secret_key = SecretKey::random(&mut rand::rngs::OsRng);
        let public_key = secret_key.public_key();

        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Create a key pair from a 32-byte big-endian private scalar.
    ///
    /// Intended for known-answer tests.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPrivateKey` if the slice has the wrong length or
    /// the scalar is zero or not below the curve order.
    pub fn from_private(private_key: &[u8]) -> Result<Self> {
        if private_key.len() != 32 {
            return Err(Error::InvalidPrivateKey(format!(
                "P-256 private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }

        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|_| Error::InvalidPrivateKey("Scalar out of range for P-256".into()))?;
        let public_key = secret_key.public_key();

        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Run ECDH against `peer` and write the 32-byte x-coordinate into `out`.
    ///
    /// `peer` is an already validated point, so the arithmetic itself cannot
    /// fail.
    pub fn agree(&self, peer: &PublicKey, out: &mut [u8; SHARED_SECRET_LEN]) -> Result<()> {
        let shared = diffie_hellman(self.secret_key.to_nonzero_scalar(), peer.as_affine());
        out.copy_from_slice(shared.raw_secret_bytes().as_slice());
        Ok(())
    }
}

impl core::fmt::Debug for SoftwareKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SoftwareKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
