//! Value providers.
//!
//! Each provider resolves values for one source kind; all are polymorphic
//! over the same "resolve value(s) for a variable" capability so a caller
//! can hold them behind one seam.

pub mod encrypted;
pub mod env;
pub mod vault;

use crate::env::Environment;
use crate::vault::SecretStore;
use std::collections::BTreeMap;
use tfwrap_schemas::{Result, Variable};

pub use encrypted::EncryptedProvider;
pub use env::EnvProvider;
pub use vault::VaultProvider;

/// Common capability: resolve the value mapping for one variable.
///
/// Single-value providers return a one-entry mapping keyed by the variable
/// name. Every call is independent and re-entrant; nothing is cached across
/// invocations.
pub trait ValueProvider {
    fn get_values(&self, variable: &Variable) -> Result<BTreeMap<String, String>>;
}

impl<T> ValueProvider for Box<T>
where
    T: ValueProvider + ?Sized,
{
    fn get_values(&self, variable: &Variable) -> Result<BTreeMap<String, String>> {
        (**self).get_values(variable)
    }
}

impl<E: Environment> ValueProvider for EnvProvider<E> {
    fn get_values(&self, variable: &Variable) -> Result<BTreeMap<String, String>> {
        let source = variable.env.clone().unwrap_or_default();
        let value = self.get_value(&source)?;
        Ok(BTreeMap::from([(variable.name.clone(), value)]))
    }
}

impl<S: SecretStore> ValueProvider for VaultProvider<S> {
    fn get_values(&self, variable: &Variable) -> Result<BTreeMap<String, String>> {
        let source = variable.vault.clone().unwrap_or_default();
        self.get_values(&source)
    }
}

impl<E: Environment> ValueProvider for EncryptedProvider<E> {
    fn get_values(&self, variable: &Variable) -> Result<BTreeMap<String, String>> {
        let source = variable.encrypted.clone().unwrap_or_default();
        let value = self.get_value(&source)?;
        Ok(BTreeMap::from([(variable.name.clone(), value)]))
    }
}
