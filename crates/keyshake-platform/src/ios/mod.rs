//! iOS platform implementation.
//!
//! - **SecureEnclaveKeyStore**: P-256 agreement keys created inside the
//!   Secure Enclave. Reports itself unavailable in the simulator, where the
//!   session layer falls back to software keys.

pub mod secure_enclave;

pub use secure_enclave::SecureEnclaveKeyStore;
