use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only view of the process environment.
///
/// Resolution code never touches `std::env` directly; the accessor is passed
/// in at construction so the merge engine stays a pure function of its
/// inputs and tests can simulate environment state without mutating the
/// process.
pub trait Environment: Send + Sync {
    /// Returns the value of `name`, or `None` when the variable is unset.
    fn var(&self, name: &str) -> Option<String>;
}

impl<T> Environment for Box<T>
where
    T: Environment + ?Sized,
{
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl<T> Environment for Arc<T>
where
    T: Environment + ?Sized,
{
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Accessor backed by the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory accessor for tests and embedded callers.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, builder style.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
