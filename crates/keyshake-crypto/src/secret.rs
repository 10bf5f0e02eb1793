//! Zeroizing containers for private and shared-secret material.
//!
//! Every buffer that holds raw ECDH output or hash intermediates lives in one
//! of these types so that it is cleared on every exit path:
//!
//! - [`SecretBuffer`] wipes itself on drop and on [`SecretBuffer::wipe`].
//! - [`WipeOnExit`] borrows any [`Zeroize`] value and wipes it when the guard
//!   goes out of scope, including `?` early returns.
//! - [`DerivationScratch`] holds the buffers a session reuses for each
//!   entropy derivation.

use core::fmt;
use core::ops::{Deref, DerefMut};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a raw P-256 ECDH shared secret (the affine x-coordinate).
pub const SHARED_SECRET_LEN: usize = 32;

/// Length of the SHA-256 digest used as entropy.
pub const DIGEST_LEN: usize = 32;

/// Length of one SHA-256 message block.
pub const HASH_BLOCK_LEN: usize = 64;

/// Fixed-size byte buffer for secret material.
///
/// The contents are overwritten with zeros when the buffer is dropped.
pub struct SecretBuffer<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBuffer<N> {
    /// Create an all-zero buffer.
    pub fn new() -> Self {
        Self { bytes: [0u8; N] }
    }

    /// Borrow the buffer contents.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Mutably borrow the buffer contents.
    pub fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// Overwrite the buffer with zeros.
    pub fn wipe(&mut self) {
        self.bytes.zeroize();
    }

    /// Returns `true` if every byte is zero.
    pub fn is_wiped(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Default for SecretBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Zeroize for SecretBuffer<N> {
    fn zeroize(&mut self) {
        self.wipe();
    }
}

impl<const N: usize> Drop for SecretBuffer<N> {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecretBuffer<N> {}

impl<const N: usize> fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer<{}>([REDACTED])", N)
    }
}

/// Scope guard that zeroizes the borrowed value when dropped.
///
/// # Example
///
/// ```
/// use keyshake_crypto::secret::{SecretBuffer, WipeOnExit};
///
/// let mut buf = SecretBuffer::<4>::new();
/// {
///     let mut guard = WipeOnExit::new(&mut buf);
///     guard.as_mut_bytes().copy_from_slice(&[1, 2, 3, 4]);
/// }
/// assert!(buf.is_wiped());
/// ```
pub struct WipeOnExit<'a, T: Zeroize> {
    inner: &'a mut T,
}

impl<'a, T: Zeroize> WipeOnExit<'a, T> {
    /// Guard `inner` until the end of the current scope.
    pub fn new(inner: &'a mut T) -> Self {
        Self { inner }
    }
}

impl<T: Zeroize> Deref for WipeOnExit<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.inner
    }
}

impl<T: Zeroize> DerefMut for WipeOnExit<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.inner
    }
}

impl<T: Zeroize> Drop for WipeOnExit<'_, T> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

/// Intermediate buffers used while turning an ECDH result into entropy.
///
/// The raw shared secret is written directly into the first
/// [`SHARED_SECRET_LEN`] bytes of `block`, which is then padded in place and
/// fed to the SHA-256 compression function. That block is the only copy of
/// the secret. Both buffers are wiped before
/// [`crate::entropy::derive_entropy`] returns.
#[derive(Debug, Default)]
pub struct DerivationScratch {
    /// Padded SHA-256 message block; starts with the raw ECDH output.
    pub block: SecretBuffer<HASH_BLOCK_LEN>,
    /// SHA-256 of the shared secret.
    pub digest: SecretBuffer<DIGEST_LEN>,
}

impl DerivationScratch {
    /// Create empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared-secret region at the start of `block`.
    pub fn shared_secret(&self) -> &[u8] {
        &self.block.as_bytes()[..SHARED_SECRET_LEN]
    }

    /// Returns `true` if neither buffer holds any non-zero byte.
    pub fn is_wiped(&self) -> bool {
        self.block.is_wiped() && self.digest.is_wiped()
    }
}

impl Zeroize for DerivationScratch {
    fn zeroize(&mut self) {
        self.block.wipe();
        self.digest.wipe();
    }
}
