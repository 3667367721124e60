use thiserror::Error;

/// Result alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Canonical error surface for variable resolution.
///
/// Every failure is terminal for the resolution call that produced it; no
/// retry happens below this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("required field `{field}` is not defined at any level")]
    MissingField { field: &'static str },
    #[error("vault address is not defined (argument or VAULT_ADDR)")]
    AddressNotDefined,
    #[error("vault token is not defined (argument, VAULT_TOKEN or ~/.vault-token)")]
    TokenNotDefined,
    #[error("no path defined for retrieving the secret")]
    NoPathDefined,
    #[error("unsupported method `{method}`")]
    UnsupportedMethod { method: String },
    #[error("no results/keys returned for secret: {path}")]
    NoResultsForSecret { path: String },
    #[error("failed to construct {engine} cipher engine: {message}")]
    EngineConstruction {
        engine: &'static str,
        message: String,
    },
    #[error("{engine} decryption failed: {message}")]
    Decryption {
        engine: &'static str,
        message: String,
    },
    #[error("connection error: {0}")]
    Connection(String),
}

impl Error {
    /// Stable machine-readable identifier for the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingField { .. } => "missing_field",
            Error::AddressNotDefined => "address_not_defined",
            Error::TokenNotDefined => "token_not_defined",
            Error::NoPathDefined => "no_path_defined",
            Error::UnsupportedMethod { .. } => "unsupported_method",
            Error::NoResultsForSecret { .. } => "no_results_for_secret",
            Error::EngineConstruction { .. } => "engine_construction",
            Error::Decryption { .. } => "decryption",
            Error::Connection(_) => "connection",
        }
    }
}
