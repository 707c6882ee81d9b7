// Invariant registry - named consistency checks keyed by route
//
// Populated once while the state machine is assembled, read-only after.
// An explicitly constructed object passed by reference, never a hidden
// global.

use crate::account::Account;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from invariant registration
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invariant route '{0}' is already registered")]
    DuplicateRoute(String),
}

/// The verdict of one invariant evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantReport {
    description: String,
    broken: bool,
}

impl InvariantReport {
    /// Report a holding invariant
    pub fn ok(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            broken: false,
        }
    }

    /// Report a broken invariant
    pub fn broken(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            broken: true,
        }
    }

    /// Human-readable description of what was checked or violated
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True when the invariant is violated
    pub fn is_broken(&self) -> bool {
        self.broken
    }
}

/// A pure check over the whole account set
pub type InvariantFn = Box<dyn Fn(&[Account]) -> InvariantReport + Send + Sync>;

/// Route-keyed set of invariant checks
#[derive(Default)]
pub struct InvariantRegistry {
    routes: BTreeMap<String, InvariantFn>,
}

impl InvariantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check under a route. A duplicate route is an assembly
    /// bug and is rejected.
    pub fn register<F>(&mut self, route: impl Into<String>, check: F) -> Result<(), RegistryError>
    where
        F: Fn(&[Account]) -> InvariantReport + Send + Sync + 'static,
    {
        let route = route.into();
        if self.routes.contains_key(&route) {
            return Err(RegistryError::DuplicateRoute(route));
        }
        self.routes.insert(route, Box::new(check));
        Ok(())
    }

    /// Look up a check by route
    pub fn lookup(&self, route: &str) -> Option<&InvariantFn> {
        self.routes.get(route)
    }

    /// Registered routes in sorted order
    pub fn routes(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// Number of registered invariants
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InvariantRegistry::new();
        registry
            .register("bank/test", |_| InvariantReport::ok("fine"))
            .unwrap();

        assert!(registry.lookup("bank/test").is_some());
        assert!(registry.lookup("bank/other").is_none());
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut registry = InvariantRegistry::new();
        registry
            .register("bank/test", |_| InvariantReport::ok("fine"))
            .unwrap();

        let result = registry.register("bank/test", |_| InvariantReport::ok("fine"));
        assert!(matches!(result, Err(RegistryError::DuplicateRoute(_))));
    }

    #[test]
    fn test_routes_are_sorted() {
        let mut registry = InvariantRegistry::new();
        registry.register("b/two", |_| InvariantReport::ok("")).unwrap();
        registry.register("a/one", |_| InvariantReport::ok("")).unwrap();

        assert_eq!(registry.routes(), vec!["a/one", "b/two"]);
    }
}
