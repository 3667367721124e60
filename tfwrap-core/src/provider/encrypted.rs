use crate::cipher::select_engine;
use crate::env::{Environment, ProcessEnv};
use crate::merge::require_field;
use tfwrap_schemas::{EncryptedSource, Result};

/// Value provider that decrypts an inline ciphertext.
///
/// The cipher engine is selected and constructed inside each call, never
/// cached: every resolution sees the current configuration and environment
/// snapshot.
pub struct EncryptedProvider<E = ProcessEnv> {
    env: E,
    defaults: Option<EncryptedSource>,
}

impl<E: Environment> EncryptedProvider<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            defaults: None,
        }
    }

    /// Attach client-wide defaults consulted when the variable leaves a
    /// field unset.
    pub fn with_defaults(env: E, defaults: EncryptedSource) -> Self {
        Self {
            env,
            defaults: Some(defaults),
        }
    }

    /// Decrypt the variable's ciphertext with the effective engine.
    pub fn get_value(&self, source: &EncryptedSource) -> Result<String> {
        let ciphertext = require_field(
            "encrypted.value",
            source.value.as_deref(),
            self.defaults
                .as_ref()
                .and_then(|defaults| defaults.value.as_deref()),
            None,
            &self.env,
        )?;
        let engine = select_engine(self.defaults.as_ref(), source, &self.env)?;
        tracing::debug!(engine = engine.kind().as_str(), "decrypting variable");
        engine.decrypt(&ciphertext, &self.env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{AesEngine, AES_KEY_ENV};
    use crate::env::MapEnv;
    use tfwrap_schemas::{AesEngineConfig, CipherEngineType, Error};

    const TEST_KEY: &str = "cc6af4c2bf251c1cce0aebdbd39dc91d";

    #[test]
    fn decrypts_with_a_variable_level_key() {
        let ciphertext = AesEngine::new(TEST_KEY).unwrap().encrypt("plain").unwrap();
        let provider = EncryptedProvider::new(MapEnv::new());
        let source = EncryptedSource {
            value: Some(ciphertext),
            engine: Some(CipherEngineType::Aes),
            aes: Some(AesEngineConfig {
                key: Some(TEST_KEY.into()),
            }),
            ..Default::default()
        };
        assert_eq!(provider.get_value(&source).unwrap(), "plain");
    }

    #[test]
    fn decrypts_with_an_environment_key() {
        let ciphertext = AesEngine::new(TEST_KEY).unwrap().encrypt("plain").unwrap();
        let provider = EncryptedProvider::new(MapEnv::new().set(AES_KEY_ENV, TEST_KEY));
        let source = EncryptedSource {
            value: Some(ciphertext),
            engine: Some(CipherEngineType::Aes),
            ..Default::default()
        };
        assert_eq!(provider.get_value(&source).unwrap(), "plain");
    }

    #[test]
    fn missing_ciphertext_is_reported_before_engine_selection() {
        let provider = EncryptedProvider::new(MapEnv::new());
        let err = provider.get_value(&EncryptedSource::default()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingField {
                field: "encrypted.value"
            }
        );
    }
}
