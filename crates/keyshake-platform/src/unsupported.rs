//! Key store for targets without a supported secure element.

use crate::error::{Error, Result};
use crate::traits::{HardwareAgreementKey, HardwareKeyStore};

/// Key store that never offers hardware keys.
///
/// Used on every target other than iOS devices, so sessions always fall
/// back to software key pairs there.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHardwareKeyStore;

impl HardwareKeyStore for NoHardwareKeyStore {
    fn is_available(&self) -> bool {
        false
    }

    fn generate_agreement_key(&self, _label: &str) -> Result<Box<dyn HardwareAgreementKey>> {
        Err(Error::Unavailable(
            "no secure element on this target".into(),
        ))
    }
}
