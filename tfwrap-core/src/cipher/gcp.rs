use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tfwrap_schemas::{Error, Result};

const KMS_ENDPOINT: &str = "https://cloudkms.googleapis.com/v1";
const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Cloud KMS decrypt engine.
///
/// Holds only the key resource name; the HTTP client and credentials are
/// assembled when a decrypt call is actually issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpKmsEngine {
    key_name: String,
}

impl GcpKmsEngine {
    /// Build an engine for a fully qualified KMS key resource name.
    pub fn new(key_name: &str) -> Result<Self> {
        if key_name.is_empty() {
            return Err(Error::EngineConstruction {
                engine: "gcp_kms",
                message: "key name must not be empty".into(),
            });
        }
        Ok(Self {
            key_name: key_name.to_string(),
        })
    }

    /// The configured key resource name.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Decrypt a base64 ciphertext through the KMS decrypt RPC.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| Error::Decryption {
            engine: "gcp_kms",
            message: format!("{ACCESS_TOKEN_ENV} is not set"),
        })?;

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| Error::Connection(format!("failed to build http client: {err}")))?;

        let url = format!("{KMS_ENDPOINT}/{}:decrypt", self.key_name);
        let response = client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "ciphertext": ciphertext }))
            .send()
            .map_err(|err| Error::Connection(format!("kms request failed: {err}")))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Decryption {
                engine: "gcp_kms",
                message: format!("{status} {body}"),
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|err| Error::Decryption {
            engine: "gcp_kms",
            message: format!("failed to parse decrypt response: {err}"),
        })?;
        let plaintext = parsed
            .get("plaintext")
            .and_then(|value| value.as_str())
            .ok_or_else(|| Error::Decryption {
                engine: "gcp_kms",
                message: "decrypt response missing plaintext".into(),
            })?;
        let decoded = STANDARD
            .decode(plaintext.as_bytes())
            .map_err(|err| Error::Decryption {
                engine: "gcp_kms",
                message: format!("failed to decode plaintext: {err}"),
            })?;
        String::from_utf8(decoded).map_err(|err| Error::Decryption {
            engine: "gcp_kms",
            message: format!("plaintext is not valid utf-8: {err}"),
        })
    }
}
