use crate::env::Environment;
use crate::vault::VaultSession;
use tfwrap_schemas::{Error, Result};

/// Secret-store transit decrypt engine.
///
/// Construction only pins the transit key name; the session is resolved
/// from the supplied environment accessor when a decrypt call is issued,
/// so selection never requires store connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitEngine {
    key: String,
}

impl TransitEngine {
    /// Build an engine for a named transit key.
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::EngineConstruction {
                engine: "transit",
                message: "transit key must not be empty".into(),
            });
        }
        Ok(Self {
            key: key.to_string(),
        })
    }

    /// The configured transit key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decrypt a transit ciphertext (`vault:v1:...` form).
    pub fn decrypt(&self, ciphertext: &str, env: &dyn Environment) -> Result<String> {
        let session = VaultSession::build("", "", env)?;
        session.transit_decrypt(&self.key, ciphertext)
    }
}
