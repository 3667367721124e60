//! Field-level precedence resolution.
//!
//! Every configurable field resolves independently in a fixed order:
//! variable-level value, then client-level value, then a registered
//! environment variable, then unresolved. A variable may inherit one field
//! from the client while overriding another; the chain never mixes levels
//! within a single field.

use crate::env::Environment;
use tfwrap_schemas::{Error, Result};

/// Which level supplied a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Variable,
    Client,
    Environment,
}

impl FieldSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSource::Variable => "variable",
            FieldSource::Client => "client",
            FieldSource::Environment => "environment",
        }
    }
}

/// Resolve one field through the precedence chain.
///
/// `env_var` names the environment fallback, when the field has one
/// registered. Returns `None` when no level defines the field; an empty
/// string at any level is a definition and wins.
pub fn resolve_field(
    field: &'static str,
    variable: Option<&str>,
    client: Option<&str>,
    env_var: Option<&str>,
    env: &dyn Environment,
) -> Option<(String, FieldSource)> {
    let resolved = if let Some(value) = variable {
        (value.to_string(), FieldSource::Variable)
    } else if let Some(value) = client {
        (value.to_string(), FieldSource::Client)
    } else if let Some(value) = env_var.and_then(|name| env.var(name)) {
        (value, FieldSource::Environment)
    } else {
        tracing::debug!(field, "field unresolved at every level");
        return None;
    };

    tracing::debug!(field, source = resolved.1.as_str(), "resolved field");
    Some(resolved)
}

/// Resolve a field that the selected downstream operation requires.
///
/// Unresolved optional fields are not errors; this variant is only called
/// once an operation has actually committed to needing the field.
pub fn require_field(
    field: &'static str,
    variable: Option<&str>,
    client: Option<&str>,
    env_var: Option<&str>,
    env: &dyn Environment,
) -> Result<String> {
    resolve_field(field, variable, client, env_var, env)
        .map(|(value, _)| value)
        .ok_or(Error::MissingField { field })
}
