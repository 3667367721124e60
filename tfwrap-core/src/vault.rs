//! Secret-store session building and transport.
//!
//! The session resolves its address and token locally (argument, then
//! environment, then the token file under the home directory) and performs
//! no network I/O until an operation is issued.

use crate::env::Environment;
use crate::merge::resolve_field;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;
use tfwrap_schemas::{Error, Result, VaultSource};

const TOKEN_FILE: &str = ".vault-token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Narrow capability over the secret store: read or write one path.
///
/// The HTTP session implements it against a live store; tests use
/// [`MemoryStore`]. Both calls return the raw key/value data at the path,
/// empty when the path does not exist.
pub trait SecretStore: Send + Sync {
    fn read(&self, path: &str) -> Result<BTreeMap<String, Value>>;
    fn write(&self, path: &str, params: &BTreeMap<String, String>)
        -> Result<BTreeMap<String, Value>>;
}

impl<T> SecretStore for Box<T>
where
    T: SecretStore + ?Sized,
{
    fn read(&self, path: &str) -> Result<BTreeMap<String, Value>> {
        (**self).read(path)
    }
    fn write(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, Value>> {
        (**self).write(path, params)
    }
}

/// A resolved connection to the secret store.
#[derive(Debug, Clone)]
pub struct VaultSession {
    address: String,
    token: String,
    client: Client,
}

impl VaultSession {
    /// Resolve address and token and build the HTTP client.
    ///
    /// Address: explicit argument, then `VAULT_ADDR`. Token: explicit
    /// argument, then `VAULT_TOKEN`, then `~/.vault-token`. Purely local;
    /// no handshake happens here.
    pub fn build(address: &str, token: &str, env: &dyn Environment) -> Result<Self> {
        let address = if !address.is_empty() {
            address.to_string()
        } else {
            env.var("VAULT_ADDR")
                .filter(|value| !value.is_empty())
                .ok_or(Error::AddressNotDefined)?
        };

        let token = if !token.is_empty() {
            token.to_string()
        } else {
            match env.var("VAULT_TOKEN").filter(|value| !value.is_empty()) {
                Some(value) => value,
                None => read_token_file(env)?,
            }
        };

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| Error::Connection(format!("failed to build http client: {err}")))?;

        Ok(Self {
            address,
            token,
            client,
        })
    }

    /// Resolve a session from the merged configuration levels.
    ///
    /// `address` and `token` follow the usual chain: variable-level, then
    /// client-level, then the environment (and token file) fallbacks inside
    /// [`VaultSession::build`].
    pub fn from_sources(
        client: Option<&VaultSource>,
        variable: &VaultSource,
        env: &dyn Environment,
    ) -> Result<Self> {
        let address = resolve_field(
            "vault.address",
            variable.address.as_deref(),
            client.and_then(|config| config.address.as_deref()),
            None,
            env,
        )
        .map(|(value, _)| value)
        .unwrap_or_default();
        let token = resolve_field(
            "vault.token",
            variable.token.as_deref(),
            client.and_then(|config| config.token.as_deref()),
            None,
            env,
        )
        .map(|(value, _)| value)
        .unwrap_or_default();
        Self::build(&address, &token, env)
    }

    /// The resolved store address.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let url = format!(
            "{}/v1/{}",
            self.address.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut builder = self.client.request(method, url);
        builder = builder.header("X-Vault-Token", &self.token);
        if let Some(payload) = body {
            builder = builder.json(&payload);
        }
        builder
            .send()
            .map_err(|err| Error::Connection(format!("vault request failed: {err}")))
    }

    /// Decrypt a ciphertext through the transit backend.
    pub fn transit_decrypt(&self, key: &str, ciphertext: &str) -> Result<String> {
        let path = format!("transit/decrypt/{key}");
        let body = json!({ "ciphertext": ciphertext });
        let response = self.request(Method::POST, &path, Some(body))?;
        let status = response.status();
        let text = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Decryption {
                engine: "transit",
                message: format!("{status} {text}"),
            });
        }
        let parsed: Value = serde_json::from_str(&text).map_err(|err| Error::Decryption {
            engine: "transit",
            message: format!("failed to parse transit response: {err}"),
        })?;
        let plaintext = parsed
            .get("data")
            .and_then(|data| data.get("plaintext"))
            .and_then(|value| value.as_str())
            .ok_or_else(|| Error::Decryption {
                engine: "transit",
                message: "decrypt response missing plaintext".into(),
            })?;
        let decoded = STANDARD
            .decode(plaintext.as_bytes())
            .map_err(|err| Error::Decryption {
                engine: "transit",
                message: format!("failed to decode plaintext: {err}"),
            })?;
        String::from_utf8(decoded).map_err(|err| Error::Decryption {
            engine: "transit",
            message: format!("plaintext is not valid utf-8: {err}"),
        })
    }
}

impl SecretStore for VaultSession {
    fn read(&self, path: &str) -> Result<BTreeMap<String, Value>> {
        let response = self.request(Method::GET, path, None)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(BTreeMap::new()),
            status if status.is_success() => {
                let body = response.text().unwrap_or_default();
                let parsed: LogicalResponse = serde_json::from_str(&body).map_err(|err| {
                    Error::Connection(format!("failed to decode read response: {err}"))
                })?;
                Ok(parsed.data)
            }
            status => {
                let body = response.text().unwrap_or_default();
                Err(Error::Connection(format!(
                    "read secret failed: {status} {body}"
                )))
            }
        }
    }

    fn write(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, Value>> {
        let body = serde_json::to_value(params)
            .map_err(|err| Error::Connection(format!("failed to encode params: {err}")))?;
        let response = self.request(Method::PUT, path, Some(body))?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(BTreeMap::new());
        }
        let text = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Connection(format!(
                "write secret failed: {status} {text}"
            )));
        }
        let parsed: LogicalResponse = serde_json::from_str(&text)
            .map_err(|err| Error::Connection(format!("failed to decode write response: {err}")))?;
        Ok(parsed.data)
    }
}

#[derive(Deserialize)]
struct LogicalResponse {
    #[serde(default)]
    data: BTreeMap<String, Value>,
}

fn read_token_file(env: &dyn Environment) -> Result<String> {
    let home = env
        .var("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or(Error::TokenNotDefined)?;
    let token = std::fs::read_to_string(home.join(TOKEN_FILE))
        .map(|contents| contents.trim().to_string())
        .unwrap_or_default();
    if token.is_empty() {
        return Err(Error::TokenNotDefined);
    }
    Ok(token)
}

/// In-memory store for tests and embedded callers.
///
/// Writes store their params verbatim and, like the real KV store, return
/// no readable data in the acknowledgment.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a path with data, builder style.
    pub fn with_secret(self, path: impl Into<String>, data: BTreeMap<String, Value>) -> Self {
        {
            let mut secrets = self.secrets.write().expect("memory store poisoned");
            secrets.insert(path.into(), data);
        }
        self
    }
}

impl SecretStore for MemoryStore {
    fn read(&self, path: &str) -> Result<BTreeMap<String, Value>> {
        let secrets = self
            .secrets
            .read()
            .map_err(|_| Error::Connection("memory store poisoned".into()))?;
        Ok(secrets.get(path).cloned().unwrap_or_default())
    }

    fn write(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, Value>> {
        let mut secrets = self
            .secrets
            .write()
            .map_err(|_| Error::Connection("memory store poisoned".into()))?;
        let data = params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        secrets.insert(path.to_string(), data);
        Ok(BTreeMap::new())
    }
}
