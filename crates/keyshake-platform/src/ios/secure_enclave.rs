//! Secure Enclave key store for iOS.
//!
//! Creates ephemeral P-256 key agreement keys inside Apple's Secure Enclave.
//!
//! # Security Properties
//!
//! - **Hardware-backed**: the private scalar is generated in and never leaves
//!   the Secure Enclave coprocessor
//! - **Ephemeral**: keys are not added to the Keychain (`kSecAttrIsPermanent`
//!   is false) and disappear when the last reference is released
//! - **Agreement only**: ECDH runs inside the enclave via
//!   `SecKeyCopyKeyExchangeResult`
//!
//! # Availability
//!
//! - Physical devices with a Secure Enclave (A7 chip or later)
//! - Never in the iOS Simulator (`target_abi = "sim"`)

use crate::error::{Error, Result};
use crate::traits::{HardwareAgreementKey, HardwareKeyStore};
use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::CFDictionary;
use core_foundation::error::CFError;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::PublicKey;
use security_framework::key::SecKey;
use security_framework_sys::item::{
    kSecAttrIsPermanent, kSecAttrKeyClass, kSecAttrKeyClassPublic, kSecAttrKeySizeInBits,
    kSecAttrKeyType, kSecAttrKeyTypeECSECPrimeRandom, kSecAttrTokenID,
    kSecAttrTokenIDSecureEnclave, kSecPrivateKeyAttrs,
};
use security_framework_sys::key::{
    kSecKeyAlgorithmECDHKeyExchangeStandard, SecKeyCopyKeyExchangeResult, SecKeyCreateRandomKey,
    SecKeyCreateWithData,
};
use zeroize::Zeroizing;

/// Secure Enclave key store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureEnclaveKeyStore;

impl SecureEnclaveKeyStore {
    /// Creates a new Secure Enclave key store handle.
    pub fn new() -> Self {
        Self
    }

    /// Checks if Secure Enclave is available on this device.
    fn is_secure_enclave_available() -> bool {
        // Simulator builds are never hardware-backed, even on Apple silicon hosts
        cfg!(all(target_arch = "aarch64", not(target_abi = "sim")))
    }

    /// Builds a CFString key from a static Security.framework constant.
    fn attr(constant: core_foundation::string::CFStringRef) -> CFString {
        // SAFETY: every caller passes a valid static CFString constant exported by
        // Security.framework. wrap_under_get_rule retains it without taking ownership.
        unsafe { CFString::wrap_under_get_rule(constant) }
    }

    /// Generates a new non-persistent P-256 key in Secure Enclave.
    fn generate_key() -> Result<SecKey> {
        // SAFETY: reading extern static CFString constants exported by Security.framework.
        let (
            is_permanent,
            private_key_attrs,
            token_id,
            token_secure_enclave,
            key_type,
            key_type_ec,
            key_size,
        ) = unsafe {
            (
                kSecAttrIsPermanent,
                kSecPrivateKeyAttrs,
                kSecAttrTokenID,
                kSecAttrTokenIDSecureEnclave,
                kSecAttrKeyType,
                kSecAttrKeyTypeECSECPrimeRandom,
                kSecAttrKeySizeInBits,
            )
        };

        let private_attrs: CFDictionary<CFString, CFType> = CFDictionary::from_CFType_pairs(&[(
            Self::attr(is_permanent),
            CFBoolean::false_value().as_CFType(),
        )]);

        let attributes_dict = CFDictionary::from_CFType_pairs(&[
            (
                Self::attr(token_id),
                Self::attr(token_secure_enclave).as_CFType(),
            ),
            (Self::attr(key_type), Self::attr(key_type_ec).as_CFType()),
            (Self::attr(key_size), CFNumber::from(256i32).as_CFType()),
            (Self::attr(private_key_attrs), private_attrs.as_CFType()),
        ]);

        // SAFETY: SecKeyCreateRandomKey is called with a valid CFDictionary and a valid
        // pointer to a null CFErrorRef. It returns an owned SecKeyRef or null with an owned
        // CFErrorRef; both are wrapped under the create rule exactly once.
        unsafe {
            let mut error: core_foundation::error::CFErrorRef = std::ptr::null_mut();
            let key_ref = SecKeyCreateRandomKey(attributes_dict.as_concrete_TypeRef(), &mut error);

            if key_ref.is_null() {
                if !error.is_null() {
                    let cf_error = CFError::wrap_under_create_rule(error);
                    return Err(Error::Keystore(format!(
                        "Failed to generate Secure Enclave key: {}",
                        cf_error
                    )));
                }
                return Err(Error::Keystore(
                    "Failed to generate Secure Enclave key: unknown error".into(),
                ));
            }

            Ok(SecKey::wrap_under_create_rule(key_ref))
        }
    }
}

impl HardwareKeyStore for SecureEnclaveKeyStore {
    fn is_available(&self) -> bool {
        Self::is_secure_enclave_available()
    }

    fn generate_agreement_key(&self, label: &str) -> Result<Box<dyn HardwareAgreementKey>> {
        if !Self::is_secure_enclave_available() {
            return Err(Error::Unavailable(
                "Secure Enclave not available on this device".into(),
            ));
        }

        tracing::info!("Generating Secure Enclave agreement key for {}", label);
        let key = Self::generate_key()?;

        Ok(Box::new(SecureEnclaveAgreementKey { key }))
    }
}

/// Agreement key whose private half lives in Secure Enclave.
struct SecureEnclaveAgreementKey {
    key: SecKey,
}

impl SecureEnclaveAgreementKey {
    /// Imports a peer point as a Security.framework public key.
    fn import_peer(peer: &PublicKey) -> Result<SecKey> {
        let point = peer.to_encoded_point(false);
        let data = CFData::from_buffer(point.as_bytes());

        // SAFETY: reading extern static CFString constants exported by Security.framework.
        let (key_type, key_type_ec, key_class, key_class_public) = unsafe {
            (
                kSecAttrKeyType,
                kSecAttrKeyTypeECSECPrimeRandom,
                kSecAttrKeyClass,
                kSecAttrKeyClassPublic,
            )
        };

        let attributes = CFDictionary::from_CFType_pairs(&[
            (
                SecureEnclaveKeyStore::attr(key_type),
                SecureEnclaveKeyStore::attr(key_type_ec).as_CFType(),
            ),
            (
                SecureEnclaveKeyStore::attr(key_class),
                SecureEnclaveKeyStore::attr(key_class_public).as_CFType(),
            ),
        ]);

        // SAFETY: data and attributes are valid CF objects kept alive for the call. The
        // returned SecKeyRef (or CFErrorRef) is owned and wrapped under the create rule.
        unsafe {
            let mut error: core_foundation::error::CFErrorRef = std::ptr::null_mut();
            let key_ref = SecKeyCreateWithData(
                data.as_concrete_TypeRef(),
                attributes.as_concrete_TypeRef(),
                &mut error,
            );

            if key_ref.is_null() {
                let detail = if error.is_null() {
                    "unknown error".to_string()
                } else {
                    CFError::wrap_under_create_rule(error).to_string()
                };
                return Err(Error::Keystore(format!(
                    "Failed to import peer public key: {}",
                    detail
                )));
            }

            Ok(SecKey::wrap_under_create_rule(key_ref))
        }
    }
}

impl HardwareAgreementKey for SecureEnclaveAgreementKey {
    fn public_key(&self) -> Result<PublicKey> {
        let public_key = self
            .key
            .public_key()
            .ok_or_else(|| Error::Keystore("Secure Enclave key has no public key".into()))?;

        let public_key_data = public_key
            .external_representation()
            .ok_or_else(|| Error::Keystore("Failed to export public key".into()))?;

        // P-256 external representation: 0x04 || X (32 bytes) || Y (32 bytes)
        PublicKey::from_sec1_bytes(public_key_data.bytes())
            .map_err(|_| Error::Keystore("Secure Enclave returned an invalid P-256 point".into()))
    }

    fn agree(&self, peer: &PublicKey, out: &mut [u8; 32]) -> Result<()> {
        let peer_key = Self::import_peer(peer)?;
        let parameters: CFDictionary<CFString, CFType> = CFDictionary::from_CFType_pairs(&[]);

        // SAFETY: both SecKeyRefs and the parameters dictionary are valid for the call.
        // kSecKeyAlgorithmECDHKeyExchangeStandard is a static constant. The returned
        // CFDataRef (or CFErrorRef) is owned and wrapped under the create rule.
        let shared = unsafe {
            let mut error: core_foundation::error::CFErrorRef = std::ptr::null_mut();
            let data_ref = SecKeyCopyKeyExchangeResult(
                self.key.as_concrete_TypeRef(),
                kSecKeyAlgorithmECDHKeyExchangeStandard,
                peer_key.as_concrete_TypeRef(),
                parameters.as_concrete_TypeRef(),
                &mut error,
            );

            if data_ref.is_null() {
                let detail = if error.is_null() {
                    "unknown error".to_string()
                } else {
                    CFError::wrap_under_create_rule(error).to_string()
                };
                return Err(Error::Keystore(format!(
                    "Secure Enclave key exchange failed: {}",
                    detail
                )));
            }

            CFData::wrap_under_create_rule(data_ref)
        };

        // CFData is immutable; copy out and release it immediately.
        let bytes = Zeroizing::new(shared.bytes().to_vec());
        drop(shared);

        if bytes.len() != out.len() {
            return Err(Error::Keystore(format!(
                "Unexpected shared secret length: {} (expected 32)",
                bytes.len()
            )));
        }

        out.copy_from_slice(&bytes);
        Ok(())
    }
}
