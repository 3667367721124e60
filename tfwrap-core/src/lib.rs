//! Deploy-time resolution of variable values from interchangeable secret
//! backends.
//!
//! A caller supplies a variable descriptor plus client-wide defaults; the
//! selected value provider merges the two configurations field-by-field
//! (variable > client > environment > unresolved), builds whatever session
//! or cipher engine the merge selects, and performs a single lookup. Every
//! resolution is a fresh, idempotent computation; nothing is cached or
//! persisted across calls.

pub mod cipher;
pub mod env;
pub mod merge;
pub mod provider;
pub mod vault;

pub use cipher::{select_engine, AesEngine, CipherEngine, GcpKmsEngine, TransitEngine};
pub use env::{Environment, MapEnv, ProcessEnv};
pub use merge::{require_field, resolve_field, FieldSource};
pub use provider::{EncryptedProvider, EnvProvider, ValueProvider, VaultProvider};
pub use vault::{MemoryStore, SecretStore, VaultSession};

pub use tfwrap_schemas::{
    AesEngineConfig, CipherEngineType, ClientConfig, EncryptedSource, EnvSource, Error,
    GcpKmsEngineConfig, Result, TransitEngineConfig, Variable, VaultSource,
};
