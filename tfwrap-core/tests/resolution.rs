//! End-to-end resolution through the common provider capability.

use serde_json::json;
use std::collections::BTreeMap;
use tfwrap_core::{
    AesEngine, EncryptedProvider, EnvProvider, MapEnv, MemoryStore, ValueProvider, VaultProvider,
};
use tfwrap_schemas::{
    AesEngineConfig, CipherEngineType, ClientConfig, EncryptedSource, EnvSource, Variable,
    VaultSource,
};

const TEST_AES_KEY: &str = "cc6af4c2bf251c1cce0aebdbd39dc91d";

#[test]
fn env_variable_resolves_to_a_single_entry_mapping() {
    let provider = EnvProvider::new(MapEnv::new().set("DATABASE_URL", "postgres://db"));
    let variable = Variable {
        name: "database_url".into(),
        env: Some(EnvSource {
            variable: Some("DATABASE_URL".into()),
        }),
        ..Default::default()
    };

    let values = provider.get_values(&variable).unwrap();
    assert_eq!(
        values,
        BTreeMap::from([("database_url".to_string(), "postgres://db".to_string())])
    );
}

#[test]
fn vault_variable_resolves_through_client_defaults() {
    let client = ClientConfig {
        vault: Some(VaultSource {
            path: Some("secret/app".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let store = MemoryStore::new().with_secret(
        "secret/app",
        BTreeMap::from([("api_key".to_string(), json!("k-123"))]),
    );
    let provider = VaultProvider::with_defaults(store, client.vault.unwrap());

    // The variable names the vault source but overrides nothing.
    let variable = Variable {
        name: "api_key".into(),
        vault: Some(VaultSource::default()),
        ..Default::default()
    };
    let values = ValueProvider::get_values(&provider, &variable).unwrap();
    assert_eq!(values.get("api_key").map(String::as_str), Some("k-123"));
}

#[test]
fn encrypted_variable_decrypts_through_the_trait_seam() {
    let ciphertext = AesEngine::new(TEST_AES_KEY)
        .unwrap()
        .encrypt("hunter2")
        .unwrap();
    let defaults = EncryptedSource {
        engine: Some(CipherEngineType::Aes),
        aes: Some(AesEngineConfig {
            key: Some(TEST_AES_KEY.into()),
        }),
        ..Default::default()
    };
    let provider: Box<dyn ValueProvider> =
        Box::new(EncryptedProvider::with_defaults(MapEnv::new(), defaults));

    let variable = Variable {
        name: "password".into(),
        encrypted: Some(EncryptedSource {
            value: Some(ciphertext),
            ..Default::default()
        }),
        ..Default::default()
    };
    let values = provider.get_values(&variable).unwrap();
    assert_eq!(values.get("password").map(String::as_str), Some("hunter2"));
}

#[test]
fn resolution_is_deterministic_for_identical_inputs() {
    let provider = EnvProvider::new(MapEnv::new().set("TOKEN", "abc"));
    let variable = Variable {
        name: "token".into(),
        env: Some(EnvSource {
            variable: Some("TOKEN".into()),
        }),
        ..Default::default()
    };

    let first = provider.get_values(&variable).unwrap();
    let second = provider.get_values(&variable).unwrap();
    assert_eq!(first, second);
}
