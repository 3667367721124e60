use tfwrap_core::cipher::{
    select_engine, AesEngine, CipherEngine, GcpKmsEngine, TransitEngine, AES_KEY_ENV,
    GCP_KMS_KEY_NAME_ENV, TRANSIT_KEY_ENV,
};
use tfwrap_core::MapEnv;
use tfwrap_schemas::{
    AesEngineConfig, CipherEngineType, EncryptedSource, GcpKmsEngineConfig, TransitEngineConfig,
};

const TEST_AES_KEY: &str = "cc6af4c2bf251c1cce0aebdbd39dc91d";
const OTHER_AES_KEY: &str = "4177252ea44dea6b9d66815ab5dda08b";
const TEST_KMS_KEY_NAME: &str = "projects/p/locations/l/keyRings/r/cryptoKeys/k";

fn aes_config(key: &str) -> EncryptedSource {
    EncryptedSource {
        engine: Some(CipherEngineType::Aes),
        aes: Some(AesEngineConfig {
            key: Some(key.into()),
        }),
        ..Default::default()
    }
}

#[test]
fn aes_from_client_defaults_alone() {
    let env = MapEnv::new();
    let expected = CipherEngine::Aes(AesEngine::new(TEST_AES_KEY).unwrap());

    let engine = select_engine(
        Some(&aes_config(TEST_AES_KEY)),
        &EncryptedSource::default(),
        &env,
    )
    .unwrap();
    assert_eq!(engine, expected);
}

#[test]
fn aes_from_variable_alone() {
    let env = MapEnv::new();
    let expected = CipherEngine::Aes(AesEngine::new(TEST_AES_KEY).unwrap());

    let engine = select_engine(None, &aes_config(TEST_AES_KEY), &env).unwrap();
    assert_eq!(engine, expected);
}

#[test]
fn aes_key_from_environment_fallback() {
    let env = MapEnv::new().set(AES_KEY_ENV, TEST_AES_KEY);
    let variable = EncryptedSource {
        engine: Some(CipherEngineType::Aes),
        ..Default::default()
    };

    let engine = select_engine(None, &variable, &env).unwrap();
    assert_eq!(engine, CipherEngine::Aes(AesEngine::new(TEST_AES_KEY).unwrap()));
}

#[test]
fn variable_engine_overrides_client_engine_atomically() {
    // Client pins transit with its own key and an aes key for good measure;
    // the variable pins aes. The resolved engine must be aes, built from the
    // variable's key only.
    let env = MapEnv::new();
    let client = EncryptedSource {
        engine: Some(CipherEngineType::Transit),
        transit: Some(TransitEngineConfig {
            key: Some("deploy".into()),
        }),
        aes: Some(AesEngineConfig {
            key: Some(OTHER_AES_KEY.into()),
        }),
        ..Default::default()
    };

    let engine = select_engine(Some(&client), &aes_config(TEST_AES_KEY), &env).unwrap();
    assert_eq!(engine.kind(), CipherEngineType::Aes);
    assert_eq!(engine, CipherEngine::Aes(AesEngine::new(TEST_AES_KEY).unwrap()));
}

#[test]
fn aes_parameters_still_merge_across_levels_once_type_is_fixed() {
    // Type comes from the variable, the key from the client: type is atomic
    // but parameters merge field-by-field.
    let env = MapEnv::new();
    let client = EncryptedSource {
        aes: Some(AesEngineConfig {
            key: Some(TEST_AES_KEY.into()),
        }),
        ..Default::default()
    };
    let variable = EncryptedSource {
        engine: Some(CipherEngineType::Aes),
        ..Default::default()
    };

    let engine = select_engine(Some(&client), &variable, &env).unwrap();
    assert_eq!(engine, CipherEngine::Aes(AesEngine::new(TEST_AES_KEY).unwrap()));
}

#[test]
fn gcp_kms_from_client_defaults_alone() {
    let env = MapEnv::new();
    let client = EncryptedSource {
        engine: Some(CipherEngineType::GcpKms),
        gcp_kms: Some(GcpKmsEngineConfig {
            key_name: Some(TEST_KMS_KEY_NAME.into()),
        }),
        ..Default::default()
    };

    let engine = select_engine(Some(&client), &EncryptedSource::default(), &env).unwrap();
    assert_eq!(
        engine,
        CipherEngine::GcpKms(GcpKmsEngine::new(TEST_KMS_KEY_NAME).unwrap())
    );
}

#[test]
fn gcp_kms_key_name_from_environment_fallback() {
    let env = MapEnv::new().set(GCP_KMS_KEY_NAME_ENV, TEST_KMS_KEY_NAME);
    let variable = EncryptedSource {
        engine: Some(CipherEngineType::GcpKms),
        ..Default::default()
    };

    let engine = select_engine(None, &variable, &env).unwrap();
    assert_eq!(
        engine,
        CipherEngine::GcpKms(GcpKmsEngine::new(TEST_KMS_KEY_NAME).unwrap())
    );
}

#[test]
fn gcp_kms_variable_overrides_a_different_client_engine() {
    let env = MapEnv::new();
    let client = EncryptedSource {
        engine: Some(CipherEngineType::Transit),
        gcp_kms: Some(GcpKmsEngineConfig {
            key_name: Some("bar".into()),
        }),
        ..Default::default()
    };
    let variable = EncryptedSource {
        engine: Some(CipherEngineType::GcpKms),
        gcp_kms: Some(GcpKmsEngineConfig {
            key_name: Some(TEST_KMS_KEY_NAME.into()),
        }),
        ..Default::default()
    };

    let engine = select_engine(Some(&client), &variable, &env).unwrap();
    assert_eq!(
        engine,
        CipherEngine::GcpKms(GcpKmsEngine::new(TEST_KMS_KEY_NAME).unwrap())
    );
}

#[test]
fn transit_key_from_environment_fallback() {
    let env = MapEnv::new().set(TRANSIT_KEY_ENV, "deploy");
    let variable = EncryptedSource {
        engine: Some(CipherEngineType::Transit),
        ..Default::default()
    };

    let engine = select_engine(None, &variable, &env).unwrap();
    assert_eq!(engine, CipherEngine::Transit(TransitEngine::new("deploy").unwrap()));
}

#[test]
fn implicit_type_when_a_single_variant_is_configured() {
    let env = MapEnv::new();
    let variable = EncryptedSource {
        aes: Some(AesEngineConfig {
            key: Some(TEST_AES_KEY.into()),
        }),
        ..Default::default()
    };

    let engine = select_engine(None, &variable, &env).unwrap();
    assert_eq!(engine.kind(), CipherEngineType::Aes);
}
