// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Secret Backends
//!
//! External key/value stores an environment value can redirect to. A value of the
//! form `scheme:identifier` is looked up as `identifier` in the backend registered
//! for `scheme`.
//!
//! The parser knows nothing about concrete cloud providers: callers wrap their own
//! AWS parameter store or GCP secret manager client in a [`SecretBackend`] and
//! register it under a scheme. Lookups are blocking and are neither retried nor
//! timed out here; a backend that needs a deadline has to enforce it itself.

use std::{collections::HashMap, fmt, sync::Arc};

/// Error type a backend reports a failed lookup with.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Single-key lookup capability of an external secret store.
pub trait SecretBackend: Send + Sync {
    /// Returns the plain (decrypted) value stored under `key`.
    fn lookup(&self, key: &str) -> Result<String, BackendError>;
}

impl<F> SecretBackend for F
where
    F: Fn(&str) -> Result<String, BackendError> + Send + Sync,
{
    fn lookup(&self, key: &str) -> Result<String, BackendError> {
        self(key)
    }
}

/// Backends keyed by the indirection scheme they serve.
///
/// Built once by the caller and shared, read-only, by every parse call.
#[derive(Clone, Default)]
pub struct Backends {
    by_scheme: HashMap<String, Arc<dyn SecretBackend>>,
}

impl Backends {
    /// Creates an empty set of backends.
    ///
    /// # Returns
    ///
    /// A `Backends` with no scheme registered, so every reserved scheme reports
    /// `BackendNotConfigured` until a backend is added.
    pub fn new() -> Backends {
        Backends::default()
    }

    /// Registers `backend` for `scheme`, replacing any previous registration.
    pub fn with(
        mut self,
        scheme: impl Into<String>,
        backend: impl SecretBackend + 'static,
    ) -> Self {
        self.insert(scheme, Arc::new(backend));
        self
    }

    /// Registers an already shared backend for `scheme`.
    pub fn insert(&mut self, scheme: impl Into<String>, backend: Arc<dyn SecretBackend>) {
        self.by_scheme.insert(scheme.into(), backend);
    }

    /// The backend serving `scheme`, if any.
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn SecretBackend>> {
        self.by_scheme.get(scheme)
    }

    /// Whether no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.by_scheme.is_empty()
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemes: Vec<&String> = self.by_scheme.keys().collect();
        schemes.sort();
        f.debug_struct("Backends").field("schemes", &schemes).finish()
    }
}

/// Backend serving secrets from memory.
///
/// Useful for local development and tests, where no real secret store is
/// reachable. Unknown keys fail the same way a remote store would.
#[derive(Debug, Clone, Default)]
pub struct FakeSecretBackend {
    secrets: HashMap<String, String>,
}

impl FakeSecretBackend {
    /// Creates a backend holding no secrets.
    pub fn new() -> FakeSecretBackend {
        FakeSecretBackend::default()
    }

    /// Stores `value` under `key`.
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }
}

impl SecretBackend for FakeSecretBackend {
    fn lookup(&self, key: &str) -> Result<String, BackendError> {
        self.secrets
            .get(key)
            .cloned()
            .ok_or_else(|| format!("secret `{key}` was not found").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_backend_serves_known_keys() {
        let backend = FakeSecretBackend::new().with_secret("db-password", "s3cr3t");

        assert_eq!(backend.lookup("db-password").ok().as_deref(), Some("s3cr3t"));
        let err = backend.lookup("other").unwrap_err();
        assert_eq!(err.to_string(), "secret `other` was not found");
    }

    #[test]
    fn closures_act_as_backends() {
        let backends = Backends::new().with("vault", |key: &str| -> Result<String, BackendError> {
            Ok(key.to_uppercase())
        });

        let backend = backends.get("vault").unwrap();
        assert_eq!(backend.lookup("token").unwrap(), "TOKEN");
        assert!(backends.get("aws").is_none());
    }

    #[test]
    fn later_registration_wins() {
        let backends = Backends::new()
            .with("aws", FakeSecretBackend::new().with_secret("k", "first"))
            .with("aws", FakeSecretBackend::new().with_secret("k", "second"));

        assert_eq!(backends.get("aws").unwrap().lookup("k").unwrap(), "second");
        assert_eq!(format!("{backends:?}"), r#"Backends { schemes: ["aws"] }"#);
    }
}
