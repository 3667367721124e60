//! Configuration schemas and error surface shared across the tfwrap
//! resolution crates.
//!
//! Every optional field is a real `Option` so that "unset" participates in
//! the variable > client > environment precedence chain; an empty string is
//! a value, not an absence.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AesEngineConfig, CipherEngineType, ClientConfig, EncryptedSource, EnvSource,
    GcpKmsEngineConfig, TransitEngineConfig, Variable, VaultSource,
};
