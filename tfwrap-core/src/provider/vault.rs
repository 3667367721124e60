use crate::vault::SecretStore;
use serde_json::Value;
use std::collections::BTreeMap;
use tfwrap_schemas::{Error, Result, VaultSource};

const METHOD_READ: &str = "read";
const METHOD_WRITE: &str = "write";

/// Value provider backed by the secret store.
pub struct VaultProvider<S> {
    store: S,
    defaults: Option<VaultSource>,
}

impl<S: SecretStore> VaultProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            defaults: None,
        }
    }

    /// Attach client-wide defaults consulted when the variable leaves a
    /// field unset.
    pub fn with_defaults(store: S, defaults: VaultSource) -> Self {
        Self {
            store,
            defaults: Some(defaults),
        }
    }

    /// Resolve the complete key/value mapping stored at the variable's path.
    ///
    /// `write` performs the write with the merged params and treats the
    /// data returned in the acknowledgment as the lookup result; an
    /// acknowledgment with no readable data surfaces as
    /// [`Error::NoResultsForSecret`], not a write failure.
    pub fn get_values(&self, source: &VaultSource) -> Result<BTreeMap<String, String>> {
        let path = source
            .path
            .as_deref()
            .or_else(|| {
                self.defaults
                    .as_ref()
                    .and_then(|defaults| defaults.path.as_deref())
            })
            .ok_or(Error::NoPathDefined)?;

        let method = source
            .method
            .as_deref()
            .or_else(|| {
                self.defaults
                    .as_ref()
                    .and_then(|defaults| defaults.method.as_deref())
            })
            .unwrap_or(METHOD_READ);

        let values = match method {
            METHOD_READ => self.store.read(path)?,
            METHOD_WRITE => {
                let params = source
                    .params
                    .as_ref()
                    .or_else(|| {
                        self.defaults
                            .as_ref()
                            .and_then(|defaults| defaults.params.as_ref())
                    })
                    .cloned()
                    .unwrap_or_default();
                self.store.write(path, &params)?
            }
            other => {
                return Err(Error::UnsupportedMethod {
                    method: other.to_string(),
                })
            }
        };

        if values.is_empty() {
            return Err(Error::NoResultsForSecret {
                path: path.to_string(),
            });
        }

        Ok(values
            .into_iter()
            .map(|(key, value)| (key, coerce(&value)))
            .collect())
    }
}

/// Render a stored value as a string.
///
/// Strings pass through verbatim; any other JSON value is rendered as
/// compact JSON so the mapping stays complete.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
