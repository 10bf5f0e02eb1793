//! Public key transport encoding.
//!
//! Public keys travel between endpoints as text: the DER-encoded
//! SubjectPublicKeyInfo of an uncompressed P-256 point, base64-encoded with
//! the standard padded alphabet. A P-256 SPKI document is always 91 bytes,
//! so encoded keys are always 124 characters.

use crate::error::DecodeError;
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use p256::pkcs8::{DecodePublicKey, EncodePublicKey};
use p256::PublicKey;

/// Length of a DER SubjectPublicKeyInfo for an uncompressed P-256 point.
pub const SPKI_DER_LEN: usize = 91;

/// A peer public key that has passed decoding and curve validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePublicKey {
    key: PublicKey,
}

impl RemotePublicKey {
    /// Borrow the validated point.
    pub fn as_public_key(&self) -> &PublicKey {
        &self.key
    }
}

impl From<PublicKey> for RemotePublicKey {
    fn from(key: PublicKey) -> Self {
        Self { key }
    }
}

/// Serialize a public key as base64(DER SubjectPublicKeyInfo).
///
/// # Errors
///
/// Returns `Error::Encoding` if DER serialization fails, which does not
/// happen for valid P-256 points.
///
/// # Example
///
/// ```
/// use keyshake_crypto::codec::encode_public_key;
/// use keyshake_crypto::keypair::SoftwareKeyPair;
///
/// let keypair = SoftwareKeyPair::generate().unwrap();
/// let encoded = encode_public_key(keypair.public_key()).unwrap();
/// assert!(encoded.starts_with("MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE"));
/// ```
pub fn encode_public_key(key: &PublicKey) -> Result<String> {
    let document = key
        .to_public_key_der()
        .map_err(|e| Error::Encoding(e.to_string()))?;

    Ok(BASE64.encode(document.as_bytes()))
}

/// Parse a peer's base64(DER SubjectPublicKeyInfo) public key.
///
/// # Errors
///
/// - `DecodeError::MalformedEncoding` if `encoded` is not valid base64
/// - `DecodeError::InvalidKey` if the bytes are not a P-256 SPKI document or
///   the point is not on the curve
pub fn decode_public_key(encoded: &str) -> core::result::Result<RemotePublicKey, DecodeError> {
    let der = BASE64.decode(encoded).map_err(|e| {
        tracing::debug!("Rejected remote public key encoding: {}", e);
        DecodeError::MalformedEncoding
    })?;

    let key = PublicKey::from_public_key_der(&der).map_err(|e| {
        tracing::debug!("Rejected remote public key ({} bytes): {}", der.len(), e);
        DecodeError::InvalidKey
    })?;

    Ok(RemotePublicKey { key })
}
