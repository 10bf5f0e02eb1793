//! ECDH P-256 handshake sessions producing hashed shared entropy.
//!
//! Each endpoint creates a [`Session`], sends its base64 DER public key to
//! the peer over any transport, and feeds the peer's key back in. Both sides
//! obtain the same 32 bytes: SHA-256 of the ECDH shared secret.
//!
//! - Local keys come from a hardware key store when available, otherwise
//!   from software (see [`provider`])
//! - Intermediate secrets are wiped on every exit path
//! - The remote key is not authenticated; bind it to an identity in the
//!   surrounding protocol if active attackers are a concern
//!
//! # Example
//!
//! ```
//! use keyshake_core::{compute_shared_entropy, create_session, get_local_public_key};
//!
//! # fn example() -> Result<(), keyshake_core::Error> {
//! let mut client = create_session("client")?;
//! let mut server = create_session("server")?;
//!
//! let client_key = get_local_public_key(&client);
//! let server_key = get_local_public_key(&server);
//!
//! let client_entropy = compute_shared_entropy(&mut client, &server_key)?;
//! let server_entropy = compute_shared_entropy(&mut server, &client_key)?;
//! assert_eq!(*client_entropy, *server_entropy);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod key_pair;
pub mod provider;
pub mod session;

pub use error::{Error, ErrorKind, Result};
pub use key_pair::{KeyBacking, KeyPairHandle};
pub use keyshake_crypto::{AgreementError, DecodeError, Entropy, ENTROPY_LEN};
pub use provider::KeyPairProvider;
pub use session::{HardwarePolicy, Session, SessionConfig};

/// Create a handshake session with the default configuration.
///
/// # Errors
///
/// Returns `Error::Initialization` if a hardware key was attempted and could
/// not be created.
pub fn create_session(label: &str) -> Result<Session> {
    Session::new(label)
}

/// The session's public key as base64(DER SubjectPublicKeyInfo).
pub fn get_local_public_key(session: &Session) -> String {
    session.local_public_key().to_string()
}

/// Derive 32 bytes of entropy from the peer's encoded public key.
///
/// # Errors
///
/// - `Error::Decode` if `remote_public_key` is malformed or not a P-256 key
/// - `Error::Agreement` if the ECDH computation fails
pub fn compute_shared_entropy(session: &mut Session, remote_public_key: &str) -> Result<Entropy> {
    session.compute_shared_entropy(remote_public_key)
}
