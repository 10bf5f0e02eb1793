//! Cryptographic primitives for the keyshake ECDH handshake.
//!
//! Implements:
//! - Software P-256 key pairs (`keypair`)
//! - Public key transport encoding, base64 of DER SubjectPublicKeyInfo (`codec`)
//! - SHA-256 entropy derivation from the ECDH shared secret (`entropy`)
//! - Self-wiping buffers for secret intermediates (`secret`)
//!
//! Secrets never leave a zeroizing container and are never logged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod entropy;
pub mod error;
pub mod keypair;
pub mod secret;

pub use codec::{decode_public_key, encode_public_key, RemotePublicKey};
pub use entropy::{derive_entropy, Entropy, ENTROPY_LEN};
pub use error::{AgreementError, DecodeError, Error, Result};
pub use keypair::SoftwareKeyPair;
pub use secret::{DerivationScratch, SecretBuffer, WipeOnExit};

pub use p256::PublicKey;
