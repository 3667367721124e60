use crate::env::{Environment, ProcessEnv};
use crate::merge::require_field;
use tfwrap_schemas::{EnvSource, Result};

/// Value provider backed by plain process environment variables.
pub struct EnvProvider<E = ProcessEnv> {
    env: E,
    defaults: Option<EnvSource>,
}

impl<E: Environment> EnvProvider<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            defaults: None,
        }
    }

    /// Attach client-wide defaults consulted when the variable leaves a
    /// field unset.
    pub fn with_defaults(env: E, defaults: EnvSource) -> Self {
        Self {
            env,
            defaults: Some(defaults),
        }
    }

    /// Resolve the variable's value.
    ///
    /// The environment variable *name* is required (variable-level, else
    /// client-level); the looked-up value itself is not — an unset variable
    /// resolves to the empty string.
    pub fn get_value(&self, source: &EnvSource) -> Result<String> {
        let name = require_field(
            "env.variable",
            source.variable.as_deref(),
            self.defaults
                .as_ref()
                .and_then(|defaults| defaults.variable.as_deref()),
            None,
            &self.env,
        )?;
        Ok(self.env.var(&name).unwrap_or_default())
    }
}
