use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A deploy-time variable together with its per-variable source overrides.
///
/// Exactly one source is normally configured; every field inside a source is
/// optional so that unset fields fall back to the client-wide defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<EncryptedSource>,
}

/// Client-wide defaults, same shape as the per-variable sources.
///
/// A field set here applies to every variable that leaves the matching field
/// unset. Nothing here is ever required on its own.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<EncryptedSource>,
}

/// Plain environment variable lookup.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSource {
    /// Name of the process environment variable holding the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

/// Secret-store (Vault) lookup parameters.
///
/// `address`/`token` configure the session, `path`/`method`/`params` the
/// operation. Unset means "inherit", which is distinct from set-to-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

/// Encrypted payload plus the cipher engine configuration used to decrypt it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSource {
    /// The ciphertext to decrypt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Which engine decrypts the value. Atomic: the variable-level type wins
    /// outright over the client-level one, never field-by-field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<CipherEngineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aes: Option<AesEngineConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_kms: Option<GcpKmsEngineConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit: Option<TransitEngineConfig>,
}

/// Symmetric-key engine parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesEngineConfig {
    /// Hex-encoded AES key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Cloud KMS engine parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpKmsEngineConfig {
    /// Fully qualified KMS key resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// Secret-store transit engine parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitEngineConfig {
    /// Name of the transit key to decrypt with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Supported cipher engine implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherEngineType {
    /// Local symmetric AES-GCM key.
    Aes,
    /// Google Cloud KMS decrypt call.
    GcpKms,
    /// Secret-store transit decrypt call.
    Transit,
}

impl CipherEngineType {
    /// Returns a static string identifier for the engine type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherEngineType::Aes => "aes",
            CipherEngineType::GcpKms => "gcp_kms",
            CipherEngineType::Transit => "transit",
        }
    }
}

impl fmt::Display for CipherEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherEngineType {
    type Err = ();

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aes" => Ok(CipherEngineType::Aes),
            "gcp_kms" | "gcp-kms" | "gcp" => Ok(CipherEngineType::GcpKms),
            "transit" | "vault" => Ok(CipherEngineType::Transit),
            _ => Err(()),
        }
    }
}
