//! Shared-secret to entropy derivation.
//!
//! The raw ECDH output is hashed with SHA-256 so that both endpoints end up
//! with a uniformly distributed 32-byte value regardless of curve encoding
//! details. The raw secret and the digest pass through a
//! [`DerivationScratch`] that is wiped before [`derive_entropy`] returns.
//!
//! The input is always exactly one shared secret, so hashing is a single
//! call to the SHA-256 compression function over a block padded in place.
//! No hasher object ever holds a copy of the secret.

use crate::error::AgreementError;
use crate::secret::{
    DerivationScratch, SecretBuffer, WipeOnExit, DIGEST_LEN, HASH_BLOCK_LEN, SHARED_SECRET_LEN,
};
use crate::Result;
use sha2::digest::consts::U64;
use sha2::digest::generic_array::GenericArray;
use zeroize::Zeroizing;

/// Length of derived entropy in bytes (SHA-256 output).
pub const ENTROPY_LEN: usize = DIGEST_LEN;

/// Derived entropy, zeroed when dropped.
pub type Entropy = Zeroizing<[u8; ENTROPY_LEN]>;

/// SHA-256 initial hash value (FIPS 180-4, 5.3.3).
const SHA256_H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Run `agree` into `scratch`, hash the result and return it as entropy.
///
/// `agree` writes the raw ECDH shared secret into the buffer it is given.
/// Any error it returns is reported as `AgreementError::ComputationFailed`;
/// the underlying detail is only logged.
///
/// Both scratch buffers are zeroed before this function returns, on success
/// and on every error path.
///
/// # Example
///
/// ```
/// use keyshake_crypto::entropy::derive_entropy;
/// use keyshake_crypto::keypair::SoftwareKeyPair;
/// use keyshake_crypto::secret::DerivationScratch;
///
/// let alice = SoftwareKeyPair::generate().unwrap();
/// let bob = SoftwareKeyPair::generate().unwrap();
/// let mut scratch = DerivationScratch::new();
///
/// let entropy = derive_entropy(&mut scratch, |out| alice.agree(bob.public_key(), out)).unwrap();
/// assert_eq!(entropy.len(), 32);
/// assert!(scratch.is_wiped());
/// ```
pub fn derive_entropy<F>(scratch: &mut DerivationScratch, agree: F) -> Result<Entropy>
where
    F: FnOnce(&mut [u8; SHARED_SECRET_LEN]) -> Result<()>,
{
    let mut scratch = WipeOnExit::new(scratch);
    let DerivationScratch { block, digest } = &mut *scratch;

    let (message, _) = block.as_mut_bytes().split_at_mut(SHARED_SECRET_LEN);
    let message = <&mut [u8; SHARED_SECRET_LEN]>::try_from(message)
        .map_err(|_| AgreementError::ComputationFailed)?;

    agree(message).map_err(|e| {
        tracing::debug!("ECDH agreement failed: {}", e);
        AgreementError::ComputationFailed
    })?;

    hash_shared_secret(block, digest);

    let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
    entropy.copy_from_slice(digest.as_bytes());

    Ok(entropy)
}

/// Pad the shared secret at the start of `block` to one SHA-256 block and
/// compress it into `digest`.
fn hash_shared_secret(
    block: &mut SecretBuffer<HASH_BLOCK_LEN>,
    digest: &mut SecretBuffer<DIGEST_LEN>,
) {
    let bytes = block.as_mut_bytes();
    bytes[SHARED_SECRET_LEN] = 0x80;
    bytes[SHARED_SECRET_LEN + 1..HASH_BLOCK_LEN - 8].fill(0);
    let bit_len = (SHARED_SECRET_LEN as u64) * 8;
    bytes[HASH_BLOCK_LEN - 8..].copy_from_slice(&bit_len.to_be_bytes());

    let mut state = Zeroizing::new(SHA256_H0);
    let message = GenericArray::<u8, U64>::from_slice(block.as_bytes());
    sha2::compress256(&mut state, core::slice::from_ref(message));

    for (out, word) in digest.as_mut_bytes().chunks_exact_mut(4).zip(state.iter()) {
        out.copy_from_slice(&word.to_be_bytes());
    }
}
