//! Cipher engine selection.
//!
//! The engine type is an atomic selector: the variable-level type wins
//! outright over the client-level one, and once the type is fixed only that
//! type's parameter set is consulted. Parameters themselves merge
//! field-by-field through the usual precedence chain.

pub mod aes;
pub mod gcp;
pub mod transit;

use crate::env::Environment;
use crate::merge::require_field;
use tfwrap_schemas::{CipherEngineType, EncryptedSource, Error, Result};

pub use aes::AesEngine;
pub use gcp::GcpKmsEngine;
pub use transit::TransitEngine;

/// Environment fallback for the symmetric key.
pub const AES_KEY_ENV: &str = "TFWRAP_AES_KEY";
/// Environment fallback for the KMS key resource name.
pub const GCP_KMS_KEY_NAME_ENV: &str = "TFWRAP_GCP_KMS_KEY_NAME";
/// Environment fallback for the transit key name.
pub const TRANSIT_KEY_ENV: &str = "TFWRAP_TRANSIT_KEY";

/// A constructed cipher engine, tagged by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherEngine {
    Aes(AesEngine),
    GcpKms(GcpKmsEngine),
    Transit(TransitEngine),
}

impl CipherEngine {
    /// The tag this engine was constructed under.
    pub fn kind(&self) -> CipherEngineType {
        match self {
            CipherEngine::Aes(_) => CipherEngineType::Aes,
            CipherEngine::GcpKms(_) => CipherEngineType::GcpKms,
            CipherEngine::Transit(_) => CipherEngineType::Transit,
        }
    }

    /// Decrypt a ciphertext with the underlying engine.
    ///
    /// The accessor resolves the transit session when that engine is
    /// selected; the local engines have no environment-dependent state.
    pub fn decrypt(&self, ciphertext: &str, env: &dyn Environment) -> Result<String> {
        match self {
            CipherEngine::Aes(engine) => engine.decrypt(ciphertext),
            CipherEngine::GcpKms(engine) => engine.decrypt(ciphertext),
            CipherEngine::Transit(engine) => engine.decrypt(ciphertext, env),
        }
    }
}

/// Resolve the effective engine type and build the engine.
///
/// Type precedence: variable, then client, then the single engine variant
/// configured at either level when no explicit type exists. Construction is
/// lazy relative to resolution: nothing network-facing happens here.
pub fn select_engine(
    client: Option<&EncryptedSource>,
    variable: &EncryptedSource,
    env: &dyn Environment,
) -> Result<CipherEngine> {
    let engine_type = variable
        .engine
        .or_else(|| client.and_then(|config| config.engine))
        .or_else(|| implicit_engine_type(variable))
        .or_else(|| client.and_then(implicit_engine_type))
        .ok_or(Error::MissingField { field: "engine" })?;

    tracing::debug!(engine = engine_type.as_str(), "selected cipher engine");
    build_engine(engine_type, client, variable, env)
}

/// Infer a type when exactly one engine variant is configured.
fn implicit_engine_type(config: &EncryptedSource) -> Option<CipherEngineType> {
    let mut found = None;
    for (set, engine_type) in [
        (config.aes.is_some(), CipherEngineType::Aes),
        (config.gcp_kms.is_some(), CipherEngineType::GcpKms),
        (config.transit.is_some(), CipherEngineType::Transit),
    ] {
        if set {
            if found.is_some() {
                return None;
            }
            found = Some(engine_type);
        }
    }
    found
}

fn build_engine(
    engine_type: CipherEngineType,
    client: Option<&EncryptedSource>,
    variable: &EncryptedSource,
    env: &dyn Environment,
) -> Result<CipherEngine> {
    match engine_type {
        CipherEngineType::Aes => {
            let key = require_field(
                "aes.key",
                variable.aes.as_ref().and_then(|aes| aes.key.as_deref()),
                client
                    .and_then(|config| config.aes.as_ref())
                    .and_then(|aes| aes.key.as_deref()),
                Some(AES_KEY_ENV),
                env,
            )?;
            Ok(CipherEngine::Aes(AesEngine::new(&key)?))
        }
        CipherEngineType::GcpKms => {
            let key_name = require_field(
                "gcp_kms.key_name",
                variable
                    .gcp_kms
                    .as_ref()
                    .and_then(|kms| kms.key_name.as_deref()),
                client
                    .and_then(|config| config.gcp_kms.as_ref())
                    .and_then(|kms| kms.key_name.as_deref()),
                Some(GCP_KMS_KEY_NAME_ENV),
                env,
            )?;
            Ok(CipherEngine::GcpKms(GcpKmsEngine::new(&key_name)?))
        }
        CipherEngineType::Transit => {
            let key = require_field(
                "transit.key",
                variable
                    .transit
                    .as_ref()
                    .and_then(|transit| transit.key.as_deref()),
                client
                    .and_then(|config| config.transit.as_ref())
                    .and_then(|transit| transit.key.as_deref()),
                Some(TRANSIT_KEY_ENV),
                env,
            )?;
            Ok(CipherEngine::Transit(TransitEngine::new(&key)?))
        }
    }
}
